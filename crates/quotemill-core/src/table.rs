use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column headers the extraction prompt instructs the model to emit,
/// in order.
pub const TABLE_HEADERS: [&str; 7] = [
    "Req. Ref.",
    "Project",
    "Site",
    "Env.",
    "Type",
    "Items",
    "Qty (GiB)",
];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("No table rows found in input")]
    Empty,
    #[error("Header mismatch: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Data row {row} has {found} columns (expected {expected})")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type TableResult<T> = Result<T, TableError>;

/// One requested line item, as extracted from the email table.
///
/// All fields are free text straight from the model output; key fields are
/// normalized (trim + lowercase) only at comparison time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub req_ref: String,
    pub project: String,
    pub site: String,
    pub env: String,
    /// The `Type` column. Named `kind` to stay clear of the keyword.
    pub kind: String,
    pub items: String,
    pub qty: String,
}

/// Parse a markdown table into line items.
///
/// The first pipe row must carry the fixed headers (case-insensitive);
/// separator rows (`---`) are skipped; every data row maps column-for-column
/// onto a [`LineItem`]. Non-pipe lines around the table are ignored, since
/// models occasionally wrap the table in prose despite the prompt.
pub fn parse_markdown_table(input: &str) -> TableResult<Vec<LineItem>> {
    let mut rows = input.lines().filter_map(split_row);

    let header = rows.next().ok_or(TableError::Empty)?;
    if !header_matches(&header) {
        return Err(TableError::HeaderMismatch {
            expected: TABLE_HEADERS.iter().map(ToString::to_string).collect(),
            found: header,
        });
    }

    let mut items = Vec::new();
    for (idx, cells) in rows.enumerate() {
        if is_separator(&cells) {
            continue;
        }
        if cells.len() != TABLE_HEADERS.len() {
            return Err(TableError::ColumnCount {
                row: idx + 1,
                expected: TABLE_HEADERS.len(),
                found: cells.len(),
            });
        }

        let mut cells = cells.into_iter();
        // Row length is checked above, so each `next()` yields a cell.
        items.push(LineItem {
            req_ref: cells.next().unwrap_or_default(),
            project: cells.next().unwrap_or_default(),
            site: cells.next().unwrap_or_default(),
            env: cells.next().unwrap_or_default(),
            kind: cells.next().unwrap_or_default(),
            items: cells.next().unwrap_or_default(),
            qty: cells.next().unwrap_or_default(),
        });
    }

    Ok(items)
}

fn split_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if !trimmed.contains('|') {
        return None;
    }

    let inner = trimmed
        .trim_start_matches('|')
        .trim_end_matches('|');

    Some(inner.split('|').map(|c| c.trim().to_string()).collect())
}

fn header_matches(cells: &[String]) -> bool {
    cells.len() == TABLE_HEADERS.len()
        && cells
            .iter()
            .zip(TABLE_HEADERS.iter())
            .all(|(found, expected)| found.eq_ignore_ascii_case(expected))
}

fn is_separator(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':')))
}
