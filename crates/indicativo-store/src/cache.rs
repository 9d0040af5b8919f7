//! Build-scoped lookup cache.
//!
//! The two small reference sets that size dynamic sections (financing
//! sources, population-focus categories) are each read once per build and
//! memoized. The cache lives inside one `build_document` call and is
//! dropped with it; reference data may change between builds, so nothing is
//! shared across builds.

use indicativo_model::{LookupEntry, LookupSet};
use tracing::debug;

use crate::error::StoreError;
use crate::store::{decode_rows, Filter, ReferenceStore, Table};

pub struct LookupCache<'a> {
    store: &'a dyn ReferenceStore,
    financing_sources: Option<LookupSet>,
    population_focus: Option<LookupSet>,
}

impl<'a> LookupCache<'a> {
    pub fn new(store: &'a dyn ReferenceStore) -> Self {
        Self {
            store,
            financing_sources: None,
            population_focus: None,
        }
    }

    /// Financing sources, ascending id. One store read per build.
    pub fn financing_sources(&mut self) -> Result<&LookupSet, StoreError> {
        if self.financing_sources.is_none() {
            self.financing_sources = Some(self.fetch(Table::FinancingSources)?);
        }
        Ok(self
            .financing_sources
            .as_ref()
            .expect("populated on the line above"))
    }

    /// Population-focus categories, ascending id. One store read per build.
    pub fn population_focus_categories(&mut self) -> Result<&LookupSet, StoreError> {
        if self.population_focus.is_none() {
            self.population_focus = Some(self.fetch(Table::PopulationFocusCategories)?);
        }
        Ok(self
            .population_focus
            .as_ref()
            .expect("populated on the line above"))
    }

    fn fetch(&self, table: Table) -> Result<LookupSet, StoreError> {
        let rows = self.store.select(table, &Filter::All)?;
        let entries: Vec<LookupEntry> = decode_rows(table, rows)?;
        debug!(table = table.name(), count = entries.len(), "lookup set loaded");
        Ok(LookupSet::from_entries(entries))
    }
}
