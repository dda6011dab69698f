//! Query builders for the annotation relation

use std::collections::BTreeMap;

use cozo::{DataValue, NamedRows};

use super::schema::Annotation;
use super::{DbError, StrataDb};

/// Query builder for annotations
pub struct AnnotationQuery;

impl AnnotationQuery {
    /// Get all annotations, ordered by name
    pub fn find_all(db: &StrataDb) -> Result<Vec<Annotation>, DbError> {
        let result = db.run_query(r#"
            ?[name, x, y, z, level] := *annotations{name, x, y, z, level}
            :order name
        "#, BTreeMap::new())?;

        let annotations = rows_to_annotations(&result);
        log::debug!("AnnotationQuery::find_all: {} records", annotations.len());
        Ok(annotations)
    }

    /// Count annotations in the database
    pub fn count(db: &StrataDb) -> Result<usize, DbError> {
        let result = db.run_query(r#"
            ?[count(name)] := *annotations{name}
        "#, BTreeMap::new())?;

        let count = result.rows.first()
            .and_then(|row| row.first())
            .and_then(|v| v.get_int())
            .unwrap_or(0) as usize;

        Ok(count)
    }

    /// Update an annotation by identity (name).
    ///
    /// Plain put: the record is overwritten whole, last write wins. A
    /// competing writer's changes are silently replaced.
    pub fn update(db: &StrataDb, annotation: &Annotation) -> Result<(), DbError> {
        let mut params = BTreeMap::new();
        params.insert("name".to_string(), DataValue::Str(annotation.name.as_str().into()));
        params.insert("x".to_string(), DataValue::from(annotation.x));
        params.insert("y".to_string(), DataValue::from(annotation.y));
        params.insert("z".to_string(), DataValue::from(annotation.z));
        params.insert("level".to_string(), DataValue::from(annotation.level));

        db.run_script(r#"
            ?[name, x, y, z, level] <- [[$name, $x, $y, $z, $level]]
            :put annotations {name => x, y, z, level}
        "#, params)?;

        Ok(())
    }
}

fn rows_to_annotations(result: &NamedRows) -> Vec<Annotation> {
    result.rows.iter().filter_map(|row| {
        Some(Annotation {
            name: row.get(0)?.get_str()?.to_string(),
            x: row.get(1)?.get_float()?,
            y: row.get(2)?.get_float()?,
            z: row.get(3)?.get_float()?,
            level: row.get(4)?.get_int().unwrap_or(1),
        })
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(name: &str, x: f64, level: i64) -> Annotation {
        Annotation {
            name: name.to_string(),
            x,
            y: 2.0,
            z: 3.0,
            level,
        }
    }

    #[test]
    fn test_find_all_ordered_by_name() {
        let db = StrataDb::in_memory().unwrap();
        AnnotationQuery::update(&db, &annotation("CP-02", 1.0, 2)).unwrap();
        AnnotationQuery::update(&db, &annotation("CP-01", 0.0, 1)).unwrap();

        let all = AnnotationQuery::find_all(&db).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "CP-01");
        assert_eq!(all[1].name, "CP-02");
        assert_eq!(all[1].level, 2);
    }

    #[test]
    fn test_count() {
        let db = StrataDb::in_memory().unwrap();
        assert_eq!(AnnotationQuery::count(&db).unwrap(), 0);

        AnnotationQuery::update(&db, &annotation("CP-01", 0.0, 1)).unwrap();
        AnnotationQuery::update(&db, &annotation("CP-02", 1.0, 1)).unwrap();
        assert_eq!(AnnotationQuery::count(&db).unwrap(), 2);
    }

    #[test]
    fn test_update_by_identity_overwrites() {
        let db = StrataDb::in_memory().unwrap();
        AnnotationQuery::update(&db, &annotation("CP-01", 0.0, 1)).unwrap();

        // Same identity, new values: the record is replaced, not duplicated
        let edited = Annotation {
            name: "CP-01".to_string(),
            x: 9.5,
            y: -1.0,
            z: 0.25,
            level: 3,
        };
        AnnotationQuery::update(&db, &edited).unwrap();

        let all = AnnotationQuery::find_all(&db).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], edited);
    }

    #[test]
    fn test_last_write_wins() {
        let db = StrataDb::in_memory().unwrap();
        // Two writers race on the same record; whichever put lands last
        // is what readers see
        AnnotationQuery::update(&db, &annotation("CP-01", 1.0, 1)).unwrap();
        AnnotationQuery::update(&db, &annotation("CP-01", 2.0, 2)).unwrap();

        let all = AnnotationQuery::find_all(&db).unwrap();
        assert_eq!(all[0].x, 2.0);
        assert_eq!(all[0].level, 2);
    }
}
