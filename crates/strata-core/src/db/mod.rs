//! Annotation storage using CozoDB
//!
//! Survey annotations are created by the field tooling and only listed and
//! edited from the dashboard, so the query surface is deliberately small:
//! find-all, count, and update-by-identity. Updates are plain puts with
//! last-write-wins semantics; there is no versioning or conflict check.
//!
//! All queries are performed through typed Rust APIs that generate
//! CozoScript internally.

mod queries;
mod schema;
mod service;

pub use queries::AnnotationQuery;
pub use schema::Annotation;
pub use service::AnnotationService;

use std::collections::BTreeMap;
use std::path::Path;

use cozo::{DataValue, DbInstance, NamedRows};

/// Database connection wrapper
pub struct StrataDb {
    db: DbInstance,
}

impl StrataDb {
    /// Open or create a database at the given path.
    ///
    /// Uses the SQLite backend for persistence.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let db = DbInstance::new("sqlite", path, "").map_err(|e| DbError::Open(e.to_string()))?;

        let strata_db = Self { db };
        strata_db.ensure_schema()?;

        Ok(strata_db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, DbError> {
        let db = DbInstance::new("mem", "", "").map_err(|e| DbError::Open(e.to_string()))?;

        let strata_db = Self { db };
        strata_db.ensure_schema()?;

        Ok(strata_db)
    }

    /// Ensure all required relations exist
    fn ensure_schema(&self) -> Result<(), DbError> {
        schema::create_all_relations(&self.db)?;
        Ok(())
    }

    /// Run a raw CozoScript query
    pub fn run_script(
        &self,
        script: &str,
        params: BTreeMap<String, DataValue>,
    ) -> Result<NamedRows, DbError> {
        self.db
            .run_script(script, params, cozo::ScriptMutability::Mutable)
            .map_err(|e| DbError::Query(e.to_string()))
    }

    /// Run a read-only query
    pub fn run_query(
        &self,
        script: &str,
        params: BTreeMap<String, DataValue>,
    ) -> Result<NamedRows, DbError> {
        self.db
            .run_script(script, params, cozo::ScriptMutability::Immutable)
            .map_err(|e| DbError::Query(e.to_string()))
    }
}

/// Database errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to open database: {0}")]
    Open(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

/// Helper macro for creating parameter maps
#[macro_export]
macro_rules! params {
    () => {
        std::collections::BTreeMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::BTreeMap::new();
        $(
            map.insert($key.to_string(), cozo::DataValue::from($value));
        )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = StrataDb::in_memory().unwrap();
        let result = db.run_query("?[x] := x = 1", params!()).unwrap();
        assert_eq!(result.rows.len(), 1);
    }
}
