//! Grid to XLSX serialization.
//!
//! The emitter is the only place that touches `rust_xlsxwriter`; everything
//! upstream works against the sparse [`Grid`]. Styling is limited to what
//! keeps the sections legible: bordered cells, a shaded wrapped header, a
//! merged page title and a frozen header pane.

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use indicativo_model::{CellValue, Grid};

use crate::header::{DATA_START_ROW, LABEL_ROW, TITLE_LAST_ROW};

/// MIME type the retrieval surface serves the artifact under.
pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADER_SHADE: u32 = 0xD9E1F2;

/// The generated artifact plus the attachment metadata the retrieval
/// surface needs to serve it.
#[derive(Clone, Debug)]
pub struct DocumentDownload {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Attachment filename embedding the snapshot id and a UTC timestamp.
pub fn download_filename(snapshot_id: i64, now: DateTime<Utc>) -> String {
    format!(
        "plan-indicativo-{snapshot_id}-{}.xlsx",
        now.format("%Y%m%d%H%M%S")
    )
}

/// Serialize the populated grid to a single-sheet workbook.
pub fn emit_workbook(grid: &Grid, sheet_name: &str) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(13)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let header_format = Format::new()
        .set_bold()
        .set_text_wrap()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_background_color(Color::RGB(HEADER_SHADE));
    let data_format = Format::new().set_border(FormatBorder::Thin);

    for (&(row, col), value) in grid.cells() {
        let r = row - 1;
        let c = (col - 1) as u16;
        let format = if row <= LABEL_ROW {
            &header_format
        } else {
            &data_format
        };
        match value {
            CellValue::Text(text) => {
                worksheet.write_string_with_format(r, c, text, format)?;
            }
            CellValue::Number(number) => {
                worksheet.write_number_with_format(r, c, *number, format)?;
            }
            CellValue::Formula(formula) => {
                worksheet.write_formula_with_format(r, c, formula.as_str(), format)?;
            }
        }
    }

    for merge in grid.merges() {
        let format = if merge.first_row <= TITLE_LAST_ROW {
            &title_format
        } else if merge.first_row <= LABEL_ROW {
            &header_format
        } else {
            &data_format
        };
        if merge.is_single_cell() {
            worksheet.write_string_with_format(
                merge.first_row - 1,
                (merge.first_col - 1) as u16,
                &merge.label,
                format,
            )?;
        } else {
            worksheet.merge_range(
                merge.first_row - 1,
                (merge.first_col - 1) as u16,
                merge.last_row - 1,
                (merge.last_col - 1) as u16,
                &merge.label,
                format,
            )?;
        }
    }

    for (col, width) in grid.col_widths() {
        worksheet.set_column_width((col - 1) as u16, width)?;
    }
    worksheet.set_freeze_panes(DATA_START_ROW - 1, 0)?;

    workbook.save_to_buffer()
}
