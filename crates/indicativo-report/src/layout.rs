//! Section allocation.
//!
//! The document's column space is a fixed descriptive block followed by
//! dynamic sections whose widths depend on reference-data cardinality.
//! Allocation is a pure function of its inputs, so the header renderer and
//! the row populator always agree on where every section sits: both read
//! the same [`SectionLayout`] computed once at build start.
//!
//! Ranges are handed out left to right with no gaps. A lookup-driven
//! section never collapses to zero columns; an empty lookup set still gets
//! one placeholder column so section boundaries stay well defined.

use indicativo_model::{column_label, ColumnRange, LookupSet};

/// Fixed descriptive column titles, in column order.
pub const DESCRIPTIVE_COLUMNS: [&str; 12] = [
    "No.",
    "Responsible area",
    "SDG objective",
    "Strategic line",
    "Program",
    "Result goal",
    "Product goal",
    "Product indicator",
    "MGA code",
    "BPIN code",
    "Baseline",
    "Quadrennium target",
];

/// Territorial-focus columns and the marker values that select them.
pub const TERRITORIAL: [(&str, i64); 2] = [("Urban", 1), ("Rural", 2)];

/// Execution-tracking sub-metrics, replicated once per reporting year.
pub const EXECUTION_SUBMETRICS: [&str; 2] = ["Programmed", "Executed"];

/// Reporting years covered by one document (the plan quadrennium).
pub const REPORTING_YEARS: i32 = 4;

/// Label rendered on the placeholder column of an empty lookup section.
pub const PLACEHOLDER_LABEL: &str = "N/A";

/// One column of a dynamic section. `backing` is the lookup id the column
/// represents; `None` for placeholder and fixed-label columns.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionColumn {
    pub col: u32,
    pub label: String,
    pub backing: Option<i64>,
}

/// A titled, contiguous run of columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub title: String,
    pub range: ColumnRange,
    pub columns: Vec<SectionColumn>,
}

/// The financing columns of one reporting year.
#[derive(Clone, Debug, PartialEq)]
pub struct FinancingBlock {
    pub year: i32,
    pub section: Section,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionLayout {
    pub first_col: u32,
    /// `(column, title)` per fixed descriptive column.
    pub descriptive: Vec<(u32, &'static str)>,
    pub population_focus: Section,
    pub territorial: Section,
    pub physical: Section,
    pub execution: Section,
    pub financing: Vec<FinancingBlock>,
    /// Start of the first year's financing block.
    pub fin_start: u32,
    /// End of the last year's financing block.
    pub fin_end: u32,
    /// The total column, one past `fin_end`.
    pub total_col: u32,
}

impl SectionLayout {
    /// Allocate every section starting at `first_col`.
    pub fn allocate(
        first_col: u32,
        financing_sources: &LookupSet,
        population_focus: &LookupSet,
        first_year: i32,
    ) -> Self {
        let mut cursor = first_col;

        let descriptive: Vec<(u32, &'static str)> = DESCRIPTIVE_COLUMNS
            .iter()
            .map(|&title| {
                let col = cursor;
                cursor += 1;
                (col, title)
            })
            .collect();

        let population_focus_section = section(
            &mut cursor,
            "Population focus",
            lookup_columns(population_focus),
        );
        let territorial = section(
            &mut cursor,
            "Territorial focus",
            TERRITORIAL
                .iter()
                .map(|&(label, value)| (label.to_string(), Some(value)))
                .collect(),
        );

        // Four reporting periods plus one blank forward-looking period.
        let mut physical_columns: Vec<(String, Option<i64>)> = (0..REPORTING_YEARS)
            .map(|offset| ((first_year + offset).to_string(), None))
            .collect();
        physical_columns.push(((first_year + REPORTING_YEARS).to_string(), None));
        let physical = section(&mut cursor, "Physical programming", physical_columns);

        let execution_columns: Vec<(String, Option<i64>)> = (0..REPORTING_YEARS)
            .flat_map(|offset| {
                EXECUTION_SUBMETRICS
                    .iter()
                    .map(move |metric| (format!("{metric} {}", first_year + offset), None))
            })
            .collect();
        let execution = section(&mut cursor, "Execution tracking", execution_columns);

        let fin_start = cursor;
        let financing: Vec<FinancingBlock> = (0..REPORTING_YEARS)
            .map(|offset| {
                let year = first_year + offset;
                FinancingBlock {
                    year,
                    section: section(
                        &mut cursor,
                        format!("Financing {year}"),
                        lookup_columns(financing_sources),
                    ),
                }
            })
            .collect();
        let fin_end = cursor - 1;

        let total_col = cursor;

        SectionLayout {
            first_col,
            descriptive,
            population_focus: population_focus_section,
            territorial,
            physical,
            execution,
            financing,
            fin_start,
            fin_end,
            total_col,
        }
    }

    /// The dynamic sections in column order (financing blocks flattened).
    pub fn sections(&self) -> Vec<&Section> {
        let mut sections = vec![
            &self.population_focus,
            &self.territorial,
            &self.physical,
            &self.execution,
        ];
        sections.extend(self.financing.iter().map(|block| &block.section));
        sections
    }

    /// First column after the descriptive block.
    pub fn first_dynamic_col(&self) -> u32 {
        self.population_focus.range.start
    }

    /// The forward-looking physical-programming column that is always left
    /// blank.
    pub fn forward_period_col(&self) -> u32 {
        self.physical.range.end
    }

    /// The row total as a formula over the full financing span, so the
    /// document stays consistent when recalculated.
    pub fn total_formula(&self, row: u32) -> String {
        format!(
            "=SUM({start}{row}:{end}{row})",
            start = column_label(self.fin_start),
            end = column_label(self.fin_end),
        )
    }
}

fn section(cursor: &mut u32, title: impl Into<String>, columns: Vec<(String, Option<i64>)>) -> Section {
    debug_assert!(!columns.is_empty(), "sections are never zero-width");
    let start = *cursor;
    let columns: Vec<SectionColumn> = columns
        .into_iter()
        .map(|(label, backing)| {
            let col = *cursor;
            *cursor += 1;
            SectionColumn { col, label, backing }
        })
        .collect();
    Section {
        title: title.into(),
        range: ColumnRange::new(start, *cursor - 1),
        columns,
    }
}

fn lookup_columns(set: &LookupSet) -> Vec<(String, Option<i64>)> {
    if set.is_empty() {
        // Placeholder floor: the section keeps one column so boundaries
        // (and the financing span) stay well defined.
        vec![(PLACEHOLDER_LABEL.to_string(), None)]
    } else {
        set.iter()
            .map(|entry| (entry.name.clone(), Some(entry.id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use indicativo_model::LookupEntry;
    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(count: usize) -> LookupSet {
        LookupSet::from_entries(
            (1..=count as i64)
                .map(|id| LookupEntry {
                    id,
                    name: format!("entry {id}"),
                })
                .collect(),
        )
    }

    #[test]
    fn sections_tile_with_no_gaps_or_overlaps() {
        for sources in [0usize, 1, 5] {
            for focus in [0usize, 1, 4] {
                let layout = SectionLayout::allocate(1, &lookup(sources), &lookup(focus), 2024);

                let mut cursor = layout.first_dynamic_col();
                for section in layout.sections() {
                    assert_eq!(
                        section.range.start, cursor,
                        "gap or overlap before `{}` (sources={sources}, focus={focus})",
                        section.title
                    );
                    assert_eq!(section.range.width() as usize, section.columns.len());
                    cursor = section.range.end + 1;
                }
                assert_eq!(layout.fin_end, cursor - 1);
                assert_eq!(layout.total_col, layout.fin_end + 1);

                let expected_fin_width = REPORTING_YEARS as u32 * sources.max(1) as u32;
                assert_eq!(layout.fin_end - layout.fin_start + 1, expected_fin_width);
            }
        }
    }

    #[test]
    fn empty_lookup_sets_allocate_one_placeholder_column() {
        let layout = SectionLayout::allocate(1, &lookup(0), &lookup(0), 2024);
        assert_eq!(layout.population_focus.range.width(), 1);
        assert_eq!(layout.population_focus.columns[0].label, PLACEHOLDER_LABEL);
        assert_eq!(layout.population_focus.columns[0].backing, None);
        for block in &layout.financing {
            assert_eq!(block.section.range.width(), 1);
        }
    }

    #[test]
    fn allocation_is_deterministic() {
        let sources = lookup(3);
        let focus = lookup(2);
        let a = SectionLayout::allocate(1, &sources, &focus, 2024);
        let b = SectionLayout::allocate(1, &sources, &focus, 2024);
        assert_eq!(a, b);
    }

    #[test]
    fn descriptive_block_precedes_dynamic_sections() {
        let layout = SectionLayout::allocate(1, &lookup(1), &lookup(1), 2024);
        assert_eq!(layout.descriptive.len(), DESCRIPTIVE_COLUMNS.len());
        assert_eq!(layout.descriptive[0].0, 1);
        assert_eq!(
            layout.first_dynamic_col(),
            DESCRIPTIVE_COLUMNS.len() as u32 + 1
        );
    }

    #[test]
    fn physical_section_has_four_periods_plus_forward() {
        let layout = SectionLayout::allocate(1, &lookup(1), &lookup(1), 2024);
        assert_eq!(layout.physical.range.width(), 5);
        assert_eq!(layout.physical.columns[0].label, "2024");
        assert_eq!(layout.physical.columns[4].label, "2028");
        assert_eq!(layout.forward_period_col(), layout.physical.range.end);
    }

    #[test]
    fn financing_blocks_carry_consecutive_years() {
        let layout = SectionLayout::allocate(1, &lookup(2), &lookup(0), 2024);
        let years: Vec<i32> = layout.financing.iter().map(|b| b.year).collect();
        assert_eq!(years, vec![2024, 2025, 2026, 2027]);
        assert_eq!(layout.financing[0].section.title, "Financing 2024");
        assert_eq!(layout.fin_start, layout.financing[0].section.range.start);
        assert_eq!(layout.fin_end, layout.financing[3].section.range.end);
    }

    #[test]
    fn total_formula_spans_the_financing_range() {
        let layout = SectionLayout::allocate(1, &lookup(1), &lookup(0), 2024);
        let formula = layout.total_formula(5);
        let start = column_label(layout.fin_start);
        let end = column_label(layout.fin_end);
        assert_eq!(formula, format!("=SUM({start}5:{end}5)"));
    }
}
