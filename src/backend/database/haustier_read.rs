use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::query_builder::{BuiltQuery, QueryBuilder, SqlDialect};
use crate::error::{AppError, AppResult};
use crate::models::{schlagwoerter_from_column, Beschreibung, Foto, Haustier, HaustierArt};
use crate::parser::{Pageable, Suchkriterien};

/// Common trait for read operations across different database backends
#[async_trait]
pub trait HaustierReader: Send + Sync {
    /// SQL flavour the reader expects
    fn dialect(&self) -> SqlDialect;

    /// Execute a query built with `SELECT_COLUMNS`
    async fn fetch_rows(&self, query: &BuiltQuery) -> AppResult<Vec<HaustierRow>>;

    /// Execute a `COUNT(*)` query
    async fn fetch_count(&self, query: &BuiltQuery) -> AppResult<i64>;

    /// Load all photos of a pet
    async fn fetch_fotos(&self, sql: &str, haustier_id: i64) -> AppResult<Vec<Foto>>;

    /// Count pets with the given name, ignoring `exclude_id`
    async fn count_by_name(&self, name: &str, exclude_id: Option<i64>) -> AppResult<i64>;
}

/// One result row of the pet/description join, decoded into
/// database-independent types
#[derive(Debug, Clone)]
pub struct HaustierRow {
    pub id: i64,
    pub version: i32,
    pub name: String,
    pub alter: i32,
    pub art: String,
    pub gewicht: Decimal,
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: NaiveDate,
    pub rasse: String,
    pub schlagwoerter: Option<String>,
    pub erzeugt: Option<DateTime<Utc>>,
    pub aktualisiert: Option<DateTime<Utc>>,
    pub beschreibung_id: i64,
    pub beschreibung: String,
    pub haltungshinweise: Option<String>,
}

/// Processor for turning rows into entities
pub struct HaustierReadProcessor;

impl HaustierReadProcessor {
    pub fn row_to_haustier(row: HaustierRow) -> AppResult<Haustier> {
        let art = row.art.parse::<HaustierArt>().map_err(|e| {
            AppError::Database(format!("Invalid art stored for pet {}: {}", row.id, e))
        })?;

        Ok(Haustier {
            id: Some(row.id),
            version: Some(row.version),
            name: row.name,
            alter: row.alter,
            art,
            gewicht: row.gewicht,
            groesse: row.groesse,
            vermittelt: row.vermittelt,
            aufnahmedatum: row.aufnahmedatum,
            rasse: row.rasse,
            schlagwoerter: schlagwoerter_from_column(row.schlagwoerter),
            beschreibung: Some(Beschreibung {
                id: Some(row.beschreibung_id),
                beschreibung: row.beschreibung,
                haltungshinweise: row.haltungshinweise,
            }),
            fotos: None,
            erzeugt: row.erzeugt,
            aktualisiert: row.aktualisiert,
        })
    }
}

/// Unified read operations handler
pub struct UnifiedHaustierReadOps<T: HaustierReader> {
    reader: T,
    query_builder: QueryBuilder,
}

impl<T: HaustierReader> UnifiedHaustierReadOps<T> {
    pub fn new(reader: T) -> Self {
        let query_builder = QueryBuilder::new(reader.dialect());
        Self {
            reader,
            query_builder,
        }
    }

    pub async fn find_haustier_by_id(&self, id: i64, mit_fotos: bool) -> AppResult<Option<Haustier>> {
        let query = self.query_builder.build_id(id);
        let row = match self.reader.fetch_rows(&query).await?.into_iter().next() {
            Some(row) => row,
            None => return Ok(None),
        };

        let mut haustier = HaustierReadProcessor::row_to_haustier(row)?;
        if mit_fotos {
            let sql = self.query_builder.build_fotos();
            haustier.fotos = Some(self.reader.fetch_fotos(&sql, id).await?);
        }
        Ok(Some(haustier))
    }

    pub async fn find_haustiere(
        &self,
        criteria: &Suchkriterien,
        pageable: &Pageable,
    ) -> AppResult<(Vec<Haustier>, i64)> {
        let query = self.query_builder.build(criteria, pageable);

        let rows = self.reader.fetch_rows(&query.select).await?;
        let total = self.reader.fetch_count(&query.count).await?;

        let haustiere = rows
            .into_iter()
            .map(HaustierReadProcessor::row_to_haustier)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((haustiere, total))
    }

    pub async fn exists_by_name(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        Ok(self.reader.count_by_name(name, exclude_id).await? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> HaustierRow {
        HaustierRow {
            id: 1,
            version: 2,
            name: "Bello".to_string(),
            alter: 4,
            art: "HUND".to_string(),
            gewicht: Decimal::new(2050, 2),
            groesse: None,
            vermittelt: false,
            aufnahmedatum: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            rasse: "Dackel".to_string(),
            schlagwoerter: Some("VERSPIELT,RUHIG".to_string()),
            erzeugt: None,
            aktualisiert: None,
            beschreibung_id: 10,
            beschreibung: "Freundlich".to_string(),
            haltungshinweise: None,
        }
    }

    #[test]
    fn test_row_to_haustier() {
        let haustier = HaustierReadProcessor::row_to_haustier(row()).unwrap();
        assert_eq!(haustier.id, Some(1));
        assert_eq!(haustier.version, Some(2));
        assert_eq!(haustier.art, HaustierArt::Hund);
        assert_eq!(haustier.schlagwoerter, vec!["VERSPIELT", "RUHIG"]);
        assert_eq!(haustier.beschreibung.unwrap().id, Some(10));
        assert!(haustier.fotos.is_none());
    }

    #[test]
    fn test_invalid_art_is_a_database_error() {
        let mut row = row();
        row.art = "PFERD".to_string();
        assert!(matches!(
            HaustierReadProcessor::row_to_haustier(row),
            Err(AppError::Database(_))
        ));
    }
}
