//! Reference resolution between a frozen snapshot and the live lookup
//! tables.
//!
//! At build start the resolver issues one batched read per relation over
//! the snapshot's distinct foreign-key ids. During row population a miss in
//! a prefetched map falls back to a single-row fetch keyed by the embedded
//! id; the result (or its absence) is cached so no id is fetched twice. A
//! reference that still does not resolve degrades to an empty string for
//! the affected cell and is logged; it never aborts the build.
//!
//! The product-goal -> result-goal relation is many-to-many. The report
//! shows one result goal, strategic line and program per row, selected by
//! [`ReferenceResolver::first_linked_result_goal`]: the first link in join-
//! table insertion order wins. That policy is a product decision; see its
//! test before changing anything about the ordering.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::de::DeserializeOwned;
use tracing::warn;

use indicativo_model::{
    Area, MgaRecord, OdsObjective, PopulationFocusLink, ProductGoal, Program, ResultGoal,
    ResultGoalLink, Snapshot, StrategicLine,
};

use crate::error::StoreError;
use crate::store::{decode_rows, Filter, ReferenceStore, Table};

/// The representative planning hierarchy for one report row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lineage {
    pub result_goal: String,
    pub strategic_line: String,
    pub program: String,
}

pub struct ReferenceResolver<'a> {
    store: &'a dyn ReferenceStore,
    areas: HashMap<i64, Area>,
    objectives: HashMap<i64, OdsObjective>,
    mga: HashMap<i64, MgaRecord>,
    strategic_lines: HashMap<i64, StrategicLine>,
    result_goals: HashMap<i64, ResultGoal>,
    first_program_by_line: HashMap<i64, Program>,
    /// product goal id -> linked result goal ids, join-table order.
    result_goal_links: HashMap<i64, Vec<i64>>,
    /// product goal id -> live population-focus category ids.
    population_focus_links: HashMap<i64, Vec<i64>>,
    /// product goal id -> BPIN code, from the snapshot's project bank.
    bpin_by_goal: HashMap<i64, String>,
    /// Ids already fetched and found absent; keeps fallbacks one-shot.
    misses: HashSet<(Table, i64)>,
}

impl<'a> ReferenceResolver<'a> {
    /// Issue one batched read per relation for the snapshot's distinct ids
    /// and build the id -> record maps. A failing batched read is an
    /// upstream failure and aborts the build.
    pub fn prefetch(store: &'a dyn ReferenceStore, snapshot: &Snapshot) -> Result<Self, StoreError> {
        let goals = &snapshot.product_goals;
        let goal_ids: Vec<i64> = goals.iter().map(|g| g.id).collect();

        let areas = fetch_by_id::<Area>(
            store,
            Table::Areas,
            distinct(goals.iter().filter_map(|g| g.area_id)),
        )?;
        let objectives = fetch_by_id::<OdsObjective>(
            store,
            Table::OdsObjectives,
            distinct(goals.iter().filter_map(|g| g.ods_id)),
        )?;
        let mga = fetch_by_id::<MgaRecord>(
            store,
            Table::Mga,
            distinct(goals.iter().filter_map(|g| g.mga_id)),
        )?;

        let link_rows: Vec<ResultGoalLink> = fetch_in(
            store,
            Table::ProductGoalResultGoals,
            "product_goal_id",
            goal_ids.clone(),
        )?;
        let mut result_goal_links: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in &link_rows {
            result_goal_links
                .entry(link.product_goal_id)
                .or_default()
                .push(link.result_goal_id);
        }

        let result_goals = fetch_by_id::<ResultGoal>(
            store,
            Table::ResultGoals,
            distinct(link_rows.iter().map(|l| l.result_goal_id)),
        )?;
        let line_ids = distinct(result_goals.values().filter_map(|rg| rg.strategic_line_id));
        let strategic_lines =
            fetch_by_id::<StrategicLine>(store, Table::StrategicLines, line_ids.clone())?;

        let program_rows: Vec<Program> =
            fetch_in(store, Table::Programs, "strategic_line_id", line_ids)?;
        let mut first_program_by_line: HashMap<i64, Program> = HashMap::new();
        for program in program_rows {
            first_program_by_line
                .entry(program.strategic_line_id)
                .or_insert(program);
        }

        let focus_rows: Vec<PopulationFocusLink> = fetch_in(
            store,
            Table::ProductGoalPopulationFocus,
            "product_goal_id",
            goal_ids,
        )?;
        let mut population_focus_links: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in focus_rows {
            population_focus_links
                .entry(link.product_goal_id)
                .or_default()
                .push(link.focus_id);
        }

        let mut bpin_by_goal = HashMap::new();
        for entry in &snapshot.project_bank {
            bpin_by_goal
                .entry(entry.product_goal_id)
                .or_insert_with(|| entry.bpin_code.clone());
        }

        Ok(Self {
            store,
            areas,
            objectives,
            mga,
            strategic_lines,
            result_goals,
            first_program_by_line,
            result_goal_links,
            population_focus_links,
            bpin_by_goal,
            misses: HashSet::new(),
        })
    }

    /// First-wins selection over the many-to-many join: the first linked
    /// result goal in join-table insertion order represents the row.
    pub fn first_linked_result_goal(&self, product_goal_id: i64) -> Option<i64> {
        self.result_goal_links
            .get(&product_goal_id)
            .and_then(|ids| ids.first().copied())
    }

    /// Resolve the representative result goal, strategic line and program
    /// for a product goal. Any missing link degrades to empty fields.
    pub fn lineage(&mut self, product_goal_id: i64) -> Lineage {
        let Some(result_goal_id) = self.first_linked_result_goal(product_goal_id) else {
            return Lineage::default();
        };
        let Some(result_goal) = self.result_goal(result_goal_id) else {
            return Lineage::default();
        };
        let mut lineage = Lineage {
            result_goal: result_goal.name,
            ..Lineage::default()
        };
        let Some(line_id) = result_goal.strategic_line_id else {
            return lineage;
        };
        if let Some(line) = self.strategic_line(line_id) {
            lineage.strategic_line = line.name;
        }
        if let Some(program) = self.first_program(line_id) {
            lineage.program = program.name;
        }
        lineage
    }

    pub fn area_name(&mut self, id: Option<i64>) -> String {
        let Some(id) = id else { return String::new() };
        if let Some(area) = self.areas.get(&id) {
            return area.name.clone();
        }
        match self.fetch_single::<Area>(Table::Areas, Filter::id_eq(id), id) {
            Some(area) => {
                let name = area.name.clone();
                self.areas.insert(id, area);
                name
            }
            None => String::new(),
        }
    }

    pub fn objective_name(&mut self, id: Option<i64>) -> String {
        let Some(id) = id else { return String::new() };
        if let Some(objective) = self.objectives.get(&id) {
            return objective.name.clone();
        }
        match self.fetch_single::<OdsObjective>(Table::OdsObjectives, Filter::id_eq(id), id) {
            Some(objective) => {
                let name = objective.name.clone();
                self.objectives.insert(id, objective);
                name
            }
            None => String::new(),
        }
    }

    pub fn mga_code(&mut self, id: Option<i64>) -> String {
        let Some(id) = id else { return String::new() };
        if let Some(record) = self.mga.get(&id) {
            return record.code.clone();
        }
        match self.fetch_single::<MgaRecord>(Table::Mga, Filter::id_eq(id), id) {
            Some(record) => {
                let code = record.code.clone();
                self.mga.insert(id, record);
                code
            }
            None => String::new(),
        }
    }

    /// BPIN registration captured with the snapshot; no live fallback, the
    /// project bank travels inside the snapshot itself.
    pub fn bpin_code(&self, product_goal_id: i64) -> String {
        self.bpin_by_goal
            .get(&product_goal_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Population-focus membership for a goal: deduplicated union of the
    /// ids embedded in the snapshot and the live join table.
    pub fn population_focus(&self, goal: &ProductGoal) -> BTreeSet<i64> {
        let mut ids: BTreeSet<i64> = goal.population_focus_ids.iter().copied().collect();
        if let Some(live) = self.population_focus_links.get(&goal.id) {
            ids.extend(live.iter().copied());
        }
        ids
    }

    fn result_goal(&mut self, id: i64) -> Option<ResultGoal> {
        if let Some(goal) = self.result_goals.get(&id) {
            return Some(goal.clone());
        }
        let fetched =
            self.fetch_single::<ResultGoal>(Table::ResultGoals, Filter::id_eq(id), id)?;
        self.result_goals.insert(id, fetched.clone());
        Some(fetched)
    }

    fn strategic_line(&mut self, id: i64) -> Option<StrategicLine> {
        if let Some(line) = self.strategic_lines.get(&id) {
            return Some(line.clone());
        }
        let fetched =
            self.fetch_single::<StrategicLine>(Table::StrategicLines, Filter::id_eq(id), id)?;
        self.strategic_lines.insert(id, fetched.clone());
        Some(fetched)
    }

    fn first_program(&mut self, line_id: i64) -> Option<Program> {
        if let Some(program) = self.first_program_by_line.get(&line_id) {
            return Some(program.clone());
        }
        let fetched = self.fetch_single::<Program>(
            Table::Programs,
            Filter::Eq {
                column: "strategic_line_id",
                value: line_id,
            },
            line_id,
        )?;
        self.first_program_by_line.insert(line_id, fetched.clone());
        Some(fetched)
    }

    /// One-shot fallback fetch. A store error here is a per-record
    /// condition, not a build failure: it is logged and negatively cached
    /// like an absent row.
    fn fetch_single<T: DeserializeOwned>(
        &mut self,
        table: Table,
        filter: Filter,
        key: i64,
    ) -> Option<T> {
        if self.misses.contains(&(table, key)) {
            return None;
        }
        let fetched = self
            .store
            .select(table, &filter)
            .and_then(|rows| decode_rows::<T>(table, rows));
        match fetched {
            Ok(mut rows) if !rows.is_empty() => Some(rows.remove(0)),
            Ok(_) => {
                warn!(table = table.name(), id = key, "reference id did not resolve");
                self.misses.insert((table, key));
                None
            }
            Err(error) => {
                warn!(
                    table = table.name(),
                    id = key,
                    %error,
                    "fallback reference fetch failed"
                );
                self.misses.insert((table, key));
                None
            }
        }
    }
}

/// Distinct ids, ascending. Batched reads do not depend on order; sorting
/// keeps query shapes deterministic for tests and logs.
fn distinct(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let set: BTreeSet<i64> = ids.into_iter().collect();
    set.into_iter().collect()
}

fn fetch_in<T: DeserializeOwned>(
    store: &dyn ReferenceStore,
    table: Table,
    column: &'static str,
    values: Vec<i64>,
) -> Result<Vec<T>, StoreError> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let rows = store.select(table, &Filter::In { column, values })?;
    decode_rows(table, rows)
}

fn fetch_by_id<T: DeserializeOwned>(
    store: &dyn ReferenceStore,
    table: Table,
    ids: Vec<i64>,
) -> Result<HashMap<i64, T>, StoreError>
where
    T: HasId,
{
    let records: Vec<T> = fetch_in(store, table, "id", ids)?;
    Ok(records.into_iter().map(|r| (r.id(), r)).collect())
}

/// Internal helper so batched prefetches can key records by id.
trait HasId {
    fn id(&self) -> i64;
}

macro_rules! impl_has_id {
    ($($ty:ty),* $(,)?) => {
        $(impl HasId for $ty {
            fn id(&self) -> i64 {
                self.id
            }
        })*
    };
}

impl_has_id!(Area, OdsObjective, MgaRecord, StrategicLine, ResultGoal);

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use indicativo_model::Snapshot;

    use super::*;
    use crate::memory::InMemoryStore;

    fn store_with_hierarchy() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for (goal, result_goal) in [(1, 7), (1, 3)] {
            store.insert_row(
                Table::ProductGoalResultGoals,
                serde_json::json!({"product_goal_id": goal, "result_goal_id": result_goal}),
            );
        }
        store.insert_row(
            Table::ResultGoals,
            serde_json::json!({"id": 7, "name": "Coverage up", "strategic_line_id": 100}),
        );
        store.insert_row(
            Table::ResultGoals,
            serde_json::json!({"id": 3, "name": "Other goal", "strategic_line_id": 200}),
        );
        store.insert_row(
            Table::StrategicLines,
            serde_json::json!({"id": 100, "name": "Social development"}),
        );
        store.insert_row(
            Table::StrategicLines,
            serde_json::json!({"id": 200, "name": "Wrong line"}),
        );
        store.insert_row(
            Table::Programs,
            serde_json::json!({"id": 11, "name": "Water for all", "strategic_line_id": 100}),
        );
        store.insert_row(
            Table::Programs,
            serde_json::json!({"id": 12, "name": "Second program", "strategic_line_id": 100}),
        );
        store
    }

    fn snapshot_with_goal() -> Snapshot {
        serde_json::from_value(serde_json::json!({
            "product_goals": [{"id": 1, "name": "Build aqueduct"}]
        }))
        .unwrap()
    }

    #[test]
    fn first_linked_result_goal_wins() {
        let store = store_with_hierarchy();
        let snapshot = snapshot_with_goal();
        let mut resolver = ReferenceResolver::prefetch(&store, &snapshot).unwrap();

        assert_eq!(resolver.first_linked_result_goal(1), Some(7));
        let lineage = resolver.lineage(1);
        assert_eq!(
            lineage,
            Lineage {
                result_goal: "Coverage up".into(),
                strategic_line: "Social development".into(),
                program: "Water for all".into(),
            }
        );
    }

    #[test]
    fn missing_links_degrade_to_empty_lineage() {
        let store = InMemoryStore::new();
        let snapshot = snapshot_with_goal();
        let mut resolver = ReferenceResolver::prefetch(&store, &snapshot).unwrap();
        assert_eq!(resolver.lineage(1), Lineage::default());
    }

    #[test]
    fn population_focus_unions_snapshot_and_live_links() {
        let mut store = InMemoryStore::new();
        store.insert_row(
            Table::ProductGoalPopulationFocus,
            serde_json::json!({"product_goal_id": 1, "focus_id": 4}),
        );
        store.insert_row(
            Table::ProductGoalPopulationFocus,
            serde_json::json!({"product_goal_id": 1, "focus_id": 2}),
        );
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "product_goals": [{"id": 1, "population_focus_ids": [2, 9]}]
        }))
        .unwrap();
        let resolver = ReferenceResolver::prefetch(&store, &snapshot).unwrap();
        let focus = resolver.population_focus(&snapshot.product_goals[0]);
        assert_eq!(focus.into_iter().collect::<Vec<_>>(), vec![2, 4, 9]);
    }

    /// Wraps a store and counts per-table selects, to observe fallback
    /// caching behavior.
    struct CountingStore {
        inner: InMemoryStore,
        area_selects: AtomicUsize,
    }

    impl ReferenceStore for CountingStore {
        fn select(
            &self,
            table: Table,
            filter: &Filter,
        ) -> Result<Vec<serde_json::Value>, StoreError> {
            if table == Table::Areas {
                self.area_selects.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.select(table, filter)
        }
    }

    #[test]
    fn fallback_fetch_caches_hits_and_misses() {
        let mut inner = InMemoryStore::new();
        inner.insert_row(Table::Areas, serde_json::json!({"id": 10, "name": "Planning"}));
        let store = CountingStore {
            inner,
            area_selects: AtomicUsize::new(0),
        };
        // Snapshot has no goals, so the areas prefetch is skipped entirely
        // and every resolution below goes through the fallback path.
        let snapshot = Snapshot::default();
        let mut resolver = ReferenceResolver::prefetch(&store, &snapshot).unwrap();

        assert_eq!(resolver.area_name(Some(10)), "Planning");
        assert_eq!(resolver.area_name(Some(10)), "Planning");
        assert_eq!(store.area_selects.load(Ordering::SeqCst), 1, "hit cached");

        assert_eq!(resolver.area_name(Some(99)), "");
        assert_eq!(resolver.area_name(Some(99)), "");
        assert_eq!(store.area_selects.load(Ordering::SeqCst), 2, "miss cached");

        assert_eq!(resolver.area_name(None), "");
        assert_eq!(store.area_selects.load(Ordering::SeqCst), 2);
    }
}
