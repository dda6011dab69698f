//! CozoDB schema for survey annotations

use cozo::DbInstance;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::DbError;

/// A survey annotation record.
///
/// The name is the record identity; `level` classifies the marker
/// (alert level) and defaults to 1 when the field tooling omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default = "default_level")]
    pub level: i64,
}

fn default_level() -> i64 {
    1
}

impl Annotation {
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

fn get_existing_relations(db: &DbInstance) -> Result<std::collections::HashSet<String>, DbError> {
    let result = db
        .run_script("::relations", Default::default(), cozo::ScriptMutability::Immutable)
        .map_err(|e| DbError::Schema(e.to_string()))?;

    // First column of the listing is the relation name
    let mut relations = std::collections::HashSet::new();
    for row in result.rows {
        if let Some(name) = row.first().and_then(|v| v.get_str()) {
            relations.insert(name.to_string());
        }
    }
    Ok(relations)
}

/// Create all required relations in the database (idempotent)
pub fn create_all_relations(db: &DbInstance) -> Result<(), DbError> {
    let existing = get_existing_relations(db)?;
    log::debug!("Existing relations: {:?}", existing);

    if !existing.contains("annotations") {
        log::debug!("Creating 'annotations' relation");
        create_annotations_relation(db)?;
    }

    Ok(())
}

fn run_schema(db: &DbInstance, script: &str) -> Result<(), DbError> {
    db.run_script(script, Default::default(), cozo::ScriptMutability::Mutable)
        .map_err(|e| DbError::Schema(e.to_string()))?;
    Ok(())
}

fn create_annotations_relation(db: &DbInstance) -> Result<(), DbError> {
    run_schema(db, r#"
        {:create annotations {
            name: String =>
            x: Float,
            y: Float,
            z: Float,
            level: Int default 1
        }}
    "#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StrataDb;

    #[test]
    fn test_schema_creation_is_idempotent() {
        let db = StrataDb::in_memory().unwrap();
        // A second pass over an existing schema must not error
        create_all_relations(&db.db).unwrap();
    }

    #[test]
    fn test_level_defaults_to_one() {
        let annotation: Annotation =
            serde_yaml::from_str("name: CP-01\nx: 1.0\ny: 2.0\nz: 3.0\n").unwrap();
        assert_eq!(annotation.level, 1);
    }
}
