use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use thiserror::Error;

use crate::matcher::NOT_AVAILABLE;
use crate::quotation::{Quotation, SUMMARY_HEADERS};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Workbook write failed: {0}")]
    Xlsx(#[from] XlsxError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Write the investment-summary workbook to `path`.
pub fn write_summary(quotation: &Quotation, path: &Path) -> ExportResult<()> {
    let mut workbook = build_workbook(quotation)?;
    workbook.save(path)?;
    Ok(())
}

/// Serialize the investment-summary workbook to an in-memory buffer, for
/// callers that hand the file off instead of writing it locally.
pub fn summary_buffer(quotation: &Quotation) -> ExportResult<Vec<u8>> {
    let mut workbook = build_workbook(quotation)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(quotation: &Quotation) -> ExportResult<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in SUMMARY_HEADERS.iter().enumerate() {
        sheet.write_string(0, col_num(col), *header)?;
    }

    let mut row = 1;
    for matched in &quotation.items {
        let item = &matched.item;
        sheet.write_string(row, 0, &item.req_ref)?;
        sheet.write_string(row, 1, &item.project)?;
        sheet.write_string(row, 2, &item.site)?;
        sheet.write_string(row, 3, &item.env)?;
        sheet.write_string(row, 4, &item.kind)?;
        sheet.write_string(row, 5, &item.items)?;
        sheet.write_string(row, 6, &item.qty)?;
        write_money(sheet, row, 7, matched.unit_cost)?;
        write_money(sheet, row, 8, matched.total_cost)?;
        sheet.write_string(
            row,
            9,
            matched.quote_reference.as_deref().unwrap_or(NOT_AVAILABLE),
        )?;
        row += 1;
    }

    sheet.write_string(row, 5, "Total Investments")?;
    write_money(sheet, row, 8, Some(quotation.total_investment))?;
    row += 1;
    sheet.write_string(row, 5, "Total Investments incl. 8% GST")?;
    write_money(sheet, row, 8, Some(quotation.total_with_gst))?;

    Ok(workbook)
}

fn write_money(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    amount: Option<Decimal>,
) -> ExportResult<()> {
    match amount.and_then(|a| a.to_f64()) {
        Some(value) => sheet.write_number(row, col, value)?,
        None => sheet.write_string(row, col, NOT_AVAILABLE)?,
    };
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn col_num(col: usize) -> u16 {
    col as u16
}
