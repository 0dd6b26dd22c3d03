use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::models::HaustierArt;

pub const INVALID_CRITERIA: &str = "Ungueltige Suchkriterien";

/// Optional search criteria for pets
///
/// `beschreibung` is matched as case-insensitive substring, `alter` as
/// minimum, `gewicht` as maximum, `verspielt`/`ruhig` as keywords; every
/// other criterion is compared for equality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suchkriterien {
    pub name: Option<String>,
    pub alter: Option<i32>,
    pub art: Option<HaustierArt>,
    pub gewicht: Option<Decimal>,
    pub groesse: Option<Decimal>,
    pub vermittelt: Option<bool>,
    pub aufnahmedatum: Option<NaiveDate>,
    pub rasse: Option<String>,
    pub verspielt: bool,
    pub ruhig: bool,
    pub beschreibung: Option<String>,
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> AppResult<T> {
    value.trim().parse::<T>().map_err(|_| {
        tracing::debug!("invalid value for search criterion {}: {}", key, value);
        AppError::NotFound(INVALID_CRITERIA.to_string())
    })
}

impl Suchkriterien {
    /// Build criteria from query parameters; paging parameters must be removed beforehand
    pub fn from_params(params: &HashMap<String, String>) -> AppResult<Self> {
        let mut criteria = Suchkriterien::default();

        for (key, value) in params {
            match key.as_str() {
                "name" => criteria.name = Some(value.clone()),
                "alter" => criteria.alter = Some(parse_value(key, value)?),
                "art" => criteria.art = Some(parse_value(key, value)?),
                "gewicht" => criteria.gewicht = Some(parse_value(key, value)?),
                "groesse" => criteria.groesse = Some(parse_value(key, value)?),
                "vermittelt" => criteria.vermittelt = Some(parse_value(key, value)?),
                "aufnahmedatum" => criteria.aufnahmedatum = Some(parse_value(key, value)?),
                "rasse" => criteria.rasse = Some(value.clone()),
                "verspielt" => criteria.verspielt = value == "true",
                "ruhig" => criteria.ruhig = value == "true",
                "beschreibung" => criteria.beschreibung = Some(value.clone()),
                _ => {
                    tracing::debug!("unknown search criterion \"{}\"", key);
                    return Err(AppError::NotFound(INVALID_CRITERIA.to_string()));
                }
            }
        }

        Ok(criteria)
    }

    pub fn is_empty(&self) -> bool {
        *self == Suchkriterien::default()
    }
}
