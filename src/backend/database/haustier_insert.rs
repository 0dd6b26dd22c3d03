use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::{schlagwoerter_to_column, Beschreibung, Foto, Haustier};

/// Common trait for insert operations across different database backends
#[async_trait]
pub trait HaustierInserter: Send + Sync {
    /// Insert pet, description and photos in one transaction; returns the new ID
    async fn execute_haustier_insert(&self, data: PreparedHaustierInsertData) -> AppResult<i64>;
}

/// Prepared pet data for database insert operations
#[derive(Debug, Clone)]
pub struct PreparedHaustierInsertData {
    pub name: String,
    pub alter: i32,
    pub art: String,
    pub gewicht: Decimal,
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: NaiveDate,
    pub rasse: String,
    pub schlagwoerter: Option<String>,
    pub beschreibung: Beschreibung,
    pub fotos: Vec<Foto>,
    pub timestamp: DateTime<Utc>,
}

/// Processor for the dialect-independent part of an insert
pub struct HaustierInsertProcessor;

impl HaustierInsertProcessor {
    /// Prepare a new pet for storage
    ///
    /// A pet is never stored without its description.
    pub fn prepare_haustier_for_insert(haustier: &Haustier) -> AppResult<PreparedHaustierInsertData> {
        let beschreibung = haustier
            .beschreibung
            .clone()
            .ok_or_else(|| AppError::BadRequest("Die Beschreibung fehlt".to_string()))?;

        Ok(PreparedHaustierInsertData {
            name: haustier.name.clone(),
            alter: haustier.alter,
            art: haustier.art.as_str().to_string(),
            gewicht: haustier.gewicht,
            groesse: haustier.groesse,
            vermittelt: haustier.vermittelt,
            aufnahmedatum: haustier.aufnahmedatum,
            rasse: haustier.rasse.clone(),
            schlagwoerter: schlagwoerter_to_column(&haustier.schlagwoerter),
            beschreibung,
            fotos: haustier.fotos.clone().unwrap_or_default(),
            timestamp: Utc::now(),
        })
    }
}

/// Unified insert operations handler
pub struct UnifiedHaustierInsertOps<T: HaustierInserter> {
    inserter: T,
}

impl<T: HaustierInserter> UnifiedHaustierInsertOps<T> {
    pub fn new(inserter: T) -> Self {
        Self { inserter }
    }

    pub async fn create_haustier(&self, haustier: &Haustier) -> AppResult<i64> {
        let prepared = HaustierInsertProcessor::prepare_haustier_for_insert(haustier)?;
        let id = self.inserter.execute_haustier_insert(prepared).await?;
        tracing::debug!("create_haustier: id={}", id);
        Ok(id)
    }
}
