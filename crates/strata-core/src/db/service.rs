//! Thread-safe annotation service
//!
//! High-level API over the annotation relation, shared as an
//! `Arc<AnnotationService>` between the UI thread and background tasks.
//! CozoDB serializes access internally, so the service needs no locking
//! of its own.

use std::path::Path;
use std::sync::Arc;

use super::queries::AnnotationQuery;
use super::schema::Annotation;
use super::{DbError, StrataDb};

pub struct AnnotationService {
    db: StrataDb,
}

impl AnnotationService {
    /// Open the annotation database at the given path (returns Arc for
    /// sharing). A failure here is fatal to startup.
    pub fn open(path: &Path) -> Result<Arc<Self>, DbError> {
        let db = StrataDb::open(path)?;
        log::info!("Annotation database opened at {}", path.display());
        Ok(Arc::new(Self { db }))
    }

    /// In-memory service (for testing)
    pub fn in_memory() -> Result<Arc<Self>, DbError> {
        Ok(Arc::new(Self {
            db: StrataDb::in_memory()?,
        }))
    }

    /// Snapshot of all annotations, ordered by name
    pub fn find_all(&self) -> Result<Vec<Annotation>, DbError> {
        AnnotationQuery::find_all(&self.db)
    }

    /// Total number of annotations
    pub fn count(&self) -> Result<usize, DbError> {
        AnnotationQuery::count(&self.db)
    }

    /// Persist an edited annotation by identity, last write wins
    pub fn update(&self, annotation: &Annotation) -> Result<(), DbError> {
        AnnotationQuery::update(&self.db, annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_round_trip() {
        let service = AnnotationService::in_memory().unwrap();
        assert_eq!(service.count().unwrap(), 0);

        let record = Annotation {
            name: "Toe drain outlet".to_string(),
            x: 63.9,
            y: 35.4,
            z: 8.7,
            level: 2,
        };
        service.update(&record).unwrap();

        assert_eq!(service.count().unwrap(), 1);
        assert_eq!(service.find_all().unwrap(), vec![record]);
    }
}
