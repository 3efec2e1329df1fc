//! Drop table loader.

use std::path::Path;

use outcome_core::DropTable;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Drop table catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropTableCatalog {
    pub drop_tables: Vec<DropTable>,
}

/// Loader for drop tables from RON files.
pub struct DropTableLoader;

impl DropTableLoader {
    /// Zero-weight tables load fine here; [`outcome_core::Catalog::validate`]
    /// reports them.
    pub fn load(path: &Path) -> LoadResult<Vec<DropTable>> {
        let catalog: DropTableCatalog = parse_ron(path, "drop table catalog")?;
        Ok(catalog.drop_tables)
    }
}
