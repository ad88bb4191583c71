//! Load-once cache for [`MonthData`]
//!
//! The source workbook is treated as static for the life of the process.
//! The first caller loads it; concurrent cold-start callers wait on the same
//! load. Failed loads are not cached, so a later call retries.

use crate::error::{StrikeError, StrikeResult};
use crate::loader::SpreadsheetLoader;
use crate::types::MonthData;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct MonthDataCache {
    loader: SpreadsheetLoader,
    cell: OnceCell<Arc<MonthData>>,
}

impl MonthDataCache {
    pub fn new(loader: SpreadsheetLoader) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
        }
    }

    /// Cache already-loaded data (startup preload, tests)
    pub fn with_data(loader: SpreadsheetLoader, data: MonthData) -> Self {
        Self {
            loader,
            cell: OnceCell::with_value(Arc::new(data)),
        }
    }

    /// Cached data, loading it on first use
    pub fn try_get(&self) -> StrikeResult<Arc<MonthData>> {
        self.cell
            .get_or_try_init(|| {
                info!(source = %self.loader.path().display(), "loading workbook");
                self.loader.load().map(Arc::new)
            })
            .cloned()
    }

    /// Cached data, or `None` when the workbook cannot be loaded
    pub fn get(&self) -> Option<Arc<MonthData>> {
        match self.try_get() {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(error = %e, "no data available");
                None
            }
        }
    }

    /// Cached data that actually holds at least one month
    pub fn require(&self) -> StrikeResult<Arc<MonthData>> {
        let data = self.try_get()?;
        if data.is_empty() {
            return Err(StrikeError::NoData(format!(
                "no sheet with a name column in {}",
                self.loader.path().display()
            )));
        }
        Ok(data)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Drop the cached data; the next access reads the file again
    pub fn reload(&mut self) {
        self.cell = OnceCell::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, RawSheet};

    fn data() -> MonthData {
        let loader = SpreadsheetLoader::new("unused.ods");
        loader.from_sheets(vec![RawSheet::new(
            "NOVEMBRO25",
            vec![
                vec![CellValue::from("NOME")],
                vec![CellValue::from("Ana")],
            ],
        )])
    }

    #[test]
    fn test_with_data_is_loaded() {
        let cache = MonthDataCache::with_data(SpreadsheetLoader::new("unused.ods"), data());
        assert!(cache.is_loaded());
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.labels(), vec!["NOV/2025"]);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = MonthDataCache::new(SpreadsheetLoader::new("missing/file.ods"));
        assert!(cache.get().is_none());
        assert!(!cache.is_loaded());
        assert!(matches!(cache.try_get(), Err(StrikeError::Spreadsheet(_))));
    }

    #[test]
    fn test_require_rejects_empty_data() {
        let cache =
            MonthDataCache::with_data(SpreadsheetLoader::new("unused.ods"), MonthData::new());
        assert!(matches!(cache.require(), Err(StrikeError::NoData(_))));
    }

    #[test]
    fn test_reload_clears() {
        let mut cache = MonthDataCache::with_data(SpreadsheetLoader::new("missing.ods"), data());
        cache.reload();
        assert!(!cache.is_loaded());
        assert!(cache.get().is_none());
    }
}
