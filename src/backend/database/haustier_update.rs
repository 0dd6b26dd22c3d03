use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::{schlagwoerter_to_column, Haustier};

/// Common trait for update operations across different database backends
#[async_trait]
pub trait HaustierUpdater: Send + Sync {
    /// Update the scalar columns of a pet whose stored version still equals
    /// `expected_version`; returns the new version or `None` if no row matched
    async fn execute_haustier_update(&self, data: PreparedHaustierUpdateData) -> AppResult<Option<i32>>;
}

/// Prepared pet data for database update operations
///
/// Only scalar columns are carried; description, photos and the file are
/// never touched by an update.
#[derive(Debug, Clone)]
pub struct PreparedHaustierUpdateData {
    pub id: i64,
    pub expected_version: i32,
    pub name: String,
    pub alter: i32,
    pub art: String,
    pub gewicht: Decimal,
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: NaiveDate,
    pub rasse: String,
    pub schlagwoerter: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct HaustierUpdateProcessor;

impl HaustierUpdateProcessor {
    pub fn prepare_haustier_for_update(
        id: i64,
        expected_version: i32,
        haustier: &Haustier,
    ) -> AppResult<PreparedHaustierUpdateData> {
        Self::validate_version(expected_version)?;

        Ok(PreparedHaustierUpdateData {
            id,
            expected_version,
            name: haustier.name.clone(),
            alter: haustier.alter,
            art: haustier.art.as_str().to_string(),
            gewicht: haustier.gewicht,
            groesse: haustier.groesse,
            vermittelt: haustier.vermittelt,
            aufnahmedatum: haustier.aufnahmedatum,
            rasse: haustier.rasse.clone(),
            schlagwoerter: schlagwoerter_to_column(&haustier.schlagwoerter),
            timestamp: Utc::now(),
        })
    }

    /// Versions start at 0 and only grow
    pub fn validate_version(version: i32) -> AppResult<()> {
        if version < 0 {
            return Err(AppError::VersionInvalid(version.to_string()));
        }
        Ok(())
    }
}

/// Unified update operations handler
pub struct UnifiedHaustierUpdateOps<T: HaustierUpdater> {
    updater: T,
}

impl<T: HaustierUpdater> UnifiedHaustierUpdateOps<T> {
    pub fn new(updater: T) -> Self {
        Self { updater }
    }

    pub async fn update_haustier(
        &self,
        id: i64,
        expected_version: i32,
        haustier: &Haustier,
    ) -> AppResult<Option<i32>> {
        let prepared =
            HaustierUpdateProcessor::prepare_haustier_for_update(id, expected_version, haustier)?;
        let result = self.updater.execute_haustier_update(prepared).await?;
        tracing::debug!("update_haustier: id={}, new version={:?}", id, result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HaustierArt;

    #[test]
    fn test_validate_version() {
        assert!(HaustierUpdateProcessor::validate_version(0).is_ok());
        assert!(HaustierUpdateProcessor::validate_version(999).is_ok());
        assert!(matches!(
            HaustierUpdateProcessor::validate_version(-1),
            Err(AppError::VersionInvalid(_))
        ));
    }

    #[test]
    fn test_prepare_ignores_nested_entities() {
        let haustier = Haustier {
            id: Some(99),
            version: Some(5),
            name: "Hoppel".to_string(),
            alter: 1,
            art: HaustierArt::Kleintier,
            gewicht: Decimal::new(150, 2),
            groesse: None,
            vermittelt: true,
            aufnahmedatum: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            rasse: "Zwergkaninchen".to_string(),
            schlagwoerter: vec![],
            beschreibung: None,
            fotos: None,
            erzeugt: None,
            aktualisiert: None,
        };

        let prepared = HaustierUpdateProcessor::prepare_haustier_for_update(3, 1, &haustier).unwrap();
        assert_eq!(prepared.id, 3);
        assert_eq!(prepared.expected_version, 1);
        assert_eq!(prepared.art, "KLEINTIER");
        assert_eq!(prepared.schlagwoerter, None);
    }
}
