use crate::config::CalendarConfig;
use crate::source::{LoadResult, TableSource, load_table};
use crate::table::CustodyTable;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Parsed tables kept for the life of the process. Sources are static input
/// data, so entries are never invalidated.
pub struct TableCache {
    config: CalendarConfig,
    tables: RwLock<HashMap<TableSource, Arc<CustodyTable>>>,
}

impl TableCache {
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Cached table for `source`, loading it on first use. A failed load is
    /// not cached, so the next call retries.
    pub fn get_or_load(&self, source: &TableSource) -> LoadResult<Arc<CustodyTable>> {
        if let Some(table) = self.tables.read().get(source) {
            tracing::debug!(%source, "calendar cache hit");
            return Ok(table.clone());
        }

        let table = Arc::new(load_table(source, &self.config)?);
        let mut guard = self.tables.write();
        let entry = guard.entry(source.clone()).or_insert(table);
        Ok(entry.clone())
    }

    pub fn contains(&self, source: &TableSource) -> bool {
        self.tables.read().contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}
