use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const COL_REQ_REF: &str = "Req. Ref.";
pub const COL_PROJECT: &str = "Project";
pub const COL_SITE: &str = "Site";
pub const COL_ENV: &str = "Env.";
pub const COL_TYPE: &str = "Type";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_UNIT_COST: &str = "Unit Cost";
pub const COL_TOTAL_COST: &str = "Total Cost";
pub const COL_QUOTE_REFERENCE: &str = "Quote Reference #";

#[derive(Debug, Error)]
pub enum MasterError {
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
    #[error("Workbook has no worksheets")]
    NoSheet,
    #[error("Master sheet has no header row")]
    EmptySheet,
    #[error("Missing column {0:?} in master header row")]
    MissingColumn(&'static str),
    #[error("Row {row}: column {column:?} is not a number (found {value:?})")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub type MasterResult<T> = Result<T, MasterError>;

/// One priced row of the master pricing sheet. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub req_ref: String,
    pub project: String,
    pub site: String,
    pub env: String,
    pub kind: String,
    pub description: String,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub quote_reference: String,
}

/// Load the master pricing sheet from the first worksheet of an `.xlsx`
/// workbook.
///
/// Columns are located by the fixed header names, so their order in the
/// sheet does not matter. Header cells are trimmed before comparison.
pub fn load_master(path: &Path) -> MasterResult<Vec<MasterRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(MasterError::NoSheet)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(MasterError::EmptySheet)?;

    let col = |name: &'static str| -> MasterResult<usize> {
        header
            .iter()
            .position(|cell| cell_text(cell).trim() == name)
            .ok_or(MasterError::MissingColumn(name))
    };

    let req_ref = col(COL_REQ_REF)?;
    let project = col(COL_PROJECT)?;
    let site = col(COL_SITE)?;
    let env = col(COL_ENV)?;
    let kind = col(COL_TYPE)?;
    let description = col(COL_DESCRIPTION)?;
    let unit_cost = col(COL_UNIT_COST)?;
    let total_cost = col(COL_TOTAL_COST)?;
    let quote_reference = col(COL_QUOTE_REFERENCE)?;

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        if row.iter().all(|cell| cell_text(cell).trim().is_empty()) {
            continue;
        }

        // Data rows start on the second sheet row; keep 1-based numbering
        // consistent with what a spreadsheet UI shows.
        let sheet_row = idx + 2;

        records.push(MasterRecord {
            req_ref: text_at(row, req_ref),
            project: text_at(row, project),
            site: text_at(row, site),
            env: text_at(row, env),
            kind: text_at(row, kind),
            description: text_at(row, description),
            unit_cost: money_at(row, unit_cost, sheet_row, COL_UNIT_COST)?,
            total_cost: money_at(row, total_cost, sheet_row, COL_TOTAL_COST)?,
            quote_reference: text_at(row, quote_reference),
        });
    }

    Ok(records)
}

fn text_at(row: &[Data], idx: usize) -> String {
    row.get(idx).map(cell_text).unwrap_or_default()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn money_at(
    row: &[Data],
    idx: usize,
    sheet_row: usize,
    column: &'static str,
) -> MasterResult<Decimal> {
    let parsed = match row.get(idx) {
        Some(Data::Float(f)) => Decimal::from_f64(*f),
        Some(Data::Int(i)) => Decimal::from_i64(*i),
        Some(Data::String(s)) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| MasterError::BadNumber {
        row: sheet_row,
        column,
        value: text_at(row, idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_master(dir: &TempDir, rows: &[[&str; 9]]) -> std::path::PathBuf {
        let path = dir.path().join("master.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        let headers = [
            COL_REQ_REF,
            COL_PROJECT,
            COL_SITE,
            COL_ENV,
            COL_TYPE,
            COL_DESCRIPTION,
            COL_UNIT_COST,
            COL_TOTAL_COST,
            COL_QUOTE_REFERENCE,
        ];
        for (c, header) in headers.iter().enumerate() {
            sheet.write_string(0, c as u16, *header).unwrap();
        }

        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let row_num = (r + 1) as u32;
                // Cost columns go in as numbers when they parse as such,
                // mirroring how a real sheet stores them.
                if (c == 6 || c == 7) && value.parse::<f64>().is_ok() {
                    sheet
                        .write_number(row_num, c as u16, value.parse::<f64>().unwrap())
                        .unwrap();
                } else {
                    sheet.write_string(row_num, c as u16, *value).unwrap();
                }
            }
        }

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_master_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = write_master(
            &dir,
            &[["r1", "p1", "s1", "prod", "storage", "2TB SSD", "100", "200", "Q1"]],
        );

        let records = load_master(&path).unwrap();

        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.req_ref, "r1");
        assert_eq!(rec.description, "2TB SSD");
        assert_eq!(rec.unit_cost, Decimal::from(100));
        assert_eq!(rec.total_cost, Decimal::from(200));
        assert_eq!(rec.quote_reference, "Q1");
    }

    #[test]
    fn test_missing_column_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, COL_REQ_REF).unwrap();
        sheet.write_string(0, 1, COL_PROJECT).unwrap();
        workbook.save(&path).unwrap();

        let err = load_master(&path).unwrap_err();
        assert!(matches!(err, MasterError::MissingColumn(COL_SITE)));
    }

    #[test]
    fn test_bad_cost_cell_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_master(
            &dir,
            &[["r1", "p1", "s1", "prod", "storage", "2TB SSD", "TBD", "200", "Q1"]],
        );

        let err = load_master(&path).unwrap_err();
        match err {
            MasterError::BadNumber { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, COL_UNIT_COST);
                assert_eq!(value, "TBD");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_rows_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_master(
            &dir,
            &[
                ["r1", "p1", "s1", "prod", "storage", "2TB SSD", "100", "200", "Q1"],
                ["", "", "", "", "", "", "", "", ""],
                ["r2", "p1", "s1", "prod", "storage", "4TB SSD", "180", "360", "Q2"],
            ],
        );

        let records = load_master(&path).unwrap();
        assert_eq!(records.len(), 2);
    }
}
