//! Row population.
//!
//! One data row per product goal, written left to right against the
//! boundaries fixed by the section allocator. Missing joins blank out only
//! the cells they would have supplied; a row is never dropped over a
//! degraded reference.

use std::collections::HashMap;

use tracing::debug;

use indicativo_model::{Grid, PhysicalProgramming, Snapshot};
use indicativo_store::ReferenceResolver;

use crate::header::DATA_START_ROW;
use crate::layout::SectionLayout;

/// Marker written into matching indicator columns.
pub const MARKER: &str = "X";

pub fn populate_rows(
    grid: &mut Grid,
    layout: &SectionLayout,
    snapshot: &Snapshot,
    resolver: &mut ReferenceResolver<'_>,
) {
    // First physical-programming record per goal; later duplicates are
    // capture noise and ignored.
    let mut physical_by_goal: HashMap<i64, &PhysicalProgramming> = HashMap::new();
    for record in &snapshot.physical_programming {
        physical_by_goal.entry(record.product_goal_id).or_insert(record);
    }

    // Financing amounts keyed by (goal, source, year), summed over
    // duplicate rows.
    let mut financing: HashMap<(i64, i64, i32), f64> = HashMap::new();
    for record in &snapshot.financial_programming {
        *financing
            .entry((record.product_goal_id, record.source_id, record.year))
            .or_insert(0.0) += record.amount;
    }

    for (index, goal) in snapshot.product_goals.iter().enumerate() {
        let row = DATA_START_ROW + index as u32;
        let lineage = resolver.lineage(goal.id);
        let col = |i: usize| layout.descriptive[i].0;

        grid.set_number(row, col(0), (index + 1) as f64);
        grid.set_text(row, col(1), resolver.area_name(goal.area_id));
        grid.set_text(row, col(2), resolver.objective_name(goal.ods_id));
        grid.set_text(row, col(3), lineage.strategic_line);
        grid.set_text(row, col(4), lineage.program);
        grid.set_text(row, col(5), lineage.result_goal);
        grid.set_text(row, col(6), goal.name.clone());
        grid.set_text(row, col(7), goal.indicator.clone());
        grid.set_text(row, col(8), resolver.mga_code(goal.mga_id));
        grid.set_text(row, col(9), resolver.bpin_code(goal.id));
        if let Some(baseline) = goal.baseline {
            grid.set_number(row, col(10), baseline);
        }
        if let Some(target) = goal.quadrennium_target {
            grid.set_number(row, col(11), target);
        }

        let focus = resolver.population_focus(goal);
        for column in &layout.population_focus.columns {
            if column.backing.is_some_and(|id| focus.contains(&id)) {
                grid.set_text(row, column.col, MARKER);
            }
        }

        for column in &layout.territorial.columns {
            if column
                .backing
                .is_some_and(|value| goal.territorial_focus.contains(&value))
            {
                grid.set_text(row, column.col, MARKER);
            }
        }

        // Periods 1-4 only; zipping against the four period values leaves
        // the fifth (forward-looking) column untouched by construction.
        if let Some(programming) = physical_by_goal.get(&goal.id) {
            for (column, value) in layout.physical.columns.iter().zip(programming.periods()) {
                if let Some(value) = value {
                    grid.set_number(row, column.col, value);
                }
            }
        }

        // Execution-tracking columns stay blank: they are the follow-up
        // template filled in after the document is distributed.

        for block in &layout.financing {
            for column in &block.section.columns {
                let Some(source_id) = column.backing else {
                    continue;
                };
                if let Some(&amount) = financing.get(&(goal.id, source_id, block.year)) {
                    grid.set_number(row, column.col, amount);
                }
            }
        }

        grid.set_formula(row, layout.total_col, layout.total_formula(row));
    }

    debug!(rows = snapshot.product_goals.len(), "data rows populated");
}
