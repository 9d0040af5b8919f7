//! Two-level header rendering.
//!
//! Rows 1-2 carry the page title merged across the full width. Row 3
//! carries one both-rows merge per descriptive column and one horizontal
//! merge per dynamic section; row 4 carries the per-column sub-labels.
//! Data rows start at row 5. The row-3 merges partition the column space
//! from the first descriptive column to the total column.

use chrono::{DateTime, Utc};

use indicativo_model::{Grid, MergeSpan};

use crate::layout::SectionLayout;

pub const TITLE_FIRST_ROW: u32 = 1;
pub const TITLE_LAST_ROW: u32 = 2;
pub const SECTION_ROW: u32 = 3;
pub const LABEL_ROW: u32 = 4;
pub const DATA_START_ROW: u32 = 5;

/// Column widths, chosen for legibility only.
const SEQUENCE_WIDTH: f64 = 6.0;
const NAME_WIDTH: f64 = 26.0;
const CODE_WIDTH: f64 = 12.0;
const MARKER_WIDTH: f64 = 7.0;
const PERIOD_WIDTH: f64 = 11.0;
const FINANCING_WIDTH: f64 = 14.0;
const TOTAL_WIDTH: f64 = 16.0;

pub fn render_headers(
    grid: &mut Grid,
    layout: &SectionLayout,
    snapshot_id: i64,
    captured_at: DateTime<Utc>,
) {
    let title = format!(
        "Plan Indicativo - snapshot {snapshot_id} captured {}",
        captured_at.format("%Y-%m-%d")
    );
    grid.merge(MergeSpan {
        first_row: TITLE_FIRST_ROW,
        first_col: layout.first_col,
        last_row: TITLE_LAST_ROW,
        last_col: layout.total_col,
        label: title,
    });

    for &(col, title) in &layout.descriptive {
        grid.merge(MergeSpan {
            first_row: SECTION_ROW,
            first_col: col,
            last_row: LABEL_ROW,
            last_col: col,
            label: title.to_string(),
        });
    }

    for section in layout.sections() {
        if section.range.width() == 1 {
            grid.set_text(SECTION_ROW, section.range.start, section.title.clone());
        } else {
            grid.merge(MergeSpan {
                first_row: SECTION_ROW,
                first_col: section.range.start,
                last_row: SECTION_ROW,
                last_col: section.range.end,
                label: section.title.clone(),
            });
        }
        for column in &section.columns {
            grid.set_text(LABEL_ROW, column.col, column.label.clone());
        }
    }

    grid.merge(MergeSpan {
        first_row: SECTION_ROW,
        first_col: layout.total_col,
        last_row: LABEL_ROW,
        last_col: layout.total_col,
        label: "Total".to_string(),
    });

    apply_column_widths(grid, layout);
}

fn apply_column_widths(grid: &mut Grid, layout: &SectionLayout) {
    for &(col, title) in &layout.descriptive {
        let width = match title {
            "No." => SEQUENCE_WIDTH,
            "MGA code" | "BPIN code" | "Baseline" | "Quadrennium target" => CODE_WIDTH,
            _ => NAME_WIDTH,
        };
        grid.set_col_width(col, width);
    }
    for section in [&layout.population_focus, &layout.territorial] {
        for column in &section.columns {
            grid.set_col_width(column.col, MARKER_WIDTH);
        }
    }
    for section in [&layout.physical, &layout.execution] {
        for column in &section.columns {
            grid.set_col_width(column.col, PERIOD_WIDTH);
        }
    }
    for block in &layout.financing {
        for column in &block.section.columns {
            grid.set_col_width(column.col, FINANCING_WIDTH);
        }
    }
    grid.set_col_width(layout.total_col, TOTAL_WIDTH);
}
