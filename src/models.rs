use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Species of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, async_graphql::Enum)]
#[serde(rename_all = "UPPERCASE")]
pub enum HaustierArt {
    Hund,
    Katze,
    Kleintier,
}

impl HaustierArt {
    pub fn as_str(&self) -> &'static str {
        match self {
            HaustierArt::Hund => "HUND",
            HaustierArt::Katze => "KATZE",
            HaustierArt::Kleintier => "KLEINTIER",
        }
    }
}

impl fmt::Display for HaustierArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HaustierArt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HUND" => Ok(HaustierArt::Hund),
            "KATZE" => Ok(HaustierArt::Katze),
            "KLEINTIER" => Ok(HaustierArt::Kleintier),
            _ => Err(format!("Ungueltige Art: {}", s)),
        }
    }
}

/// A pet record with its nested description and, when requested, photos
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Haustier {
    pub id: Option<i64>,
    pub version: Option<i32>,
    pub name: String,
    pub alter: i32,
    pub art: HaustierArt,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub gewicht: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: NaiveDate,
    pub rasse: String,
    pub schlagwoerter: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beschreibung: Option<Beschreibung>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fotos: Option<Vec<Foto>>,
    pub erzeugt: Option<DateTime<Utc>>,
    pub aktualisiert: Option<DateTime<Utc>>,
}

impl Haustier {
    /// The ETag value for the current version, e.g. `"3"`
    pub fn etag(&self) -> Option<String> {
        self.version.map(|version| format!("\"{}\"", version))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, async_graphql::SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Beschreibung {
    pub id: Option<i64>,
    pub beschreibung: String,
    pub haltungshinweise: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, async_graphql::SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Foto {
    pub id: Option<i64>,
    pub beschriftung: String,
    pub content_type: String,
}

/// Binary attachment of a pet, at most one per pet
#[derive(Clone, PartialEq)]
pub struct HaustierFile {
    pub id: Option<i64>,
    pub filename: String,
    pub mimetype: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for HaustierFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HaustierFile")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("mimetype", &self.mimetype)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Keywords are stored as one comma-separated column; an empty list is NULL
pub fn schlagwoerter_to_column(schlagwoerter: &[String]) -> Option<String> {
    if schlagwoerter.is_empty() {
        None
    } else {
        Some(schlagwoerter.join(","))
    }
}

pub fn schlagwoerter_from_column(column: Option<String>) -> Vec<String> {
    match column {
        Some(value) if !value.is_empty() => value.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Scalar pet fields as sent by clients, without description or photos
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HaustierDtoOhneRef {
    pub name: String,
    pub alter: i64,
    pub art: String,
    pub gewicht: Decimal,
    #[serde(default)]
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: String,
    pub rasse: String,
    #[serde(default)]
    pub schlagwoerter: Option<Vec<String>>,
}

/// Complete pet as sent by clients when creating a record
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HaustierDto {
    #[serde(flatten)]
    pub haustier: HaustierDtoOhneRef,
    pub beschreibung: BeschreibungDto,
    #[serde(default)]
    pub fotos: Option<Vec<FotoDto>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeschreibungDto {
    pub beschreibung: String,
    #[serde(default)]
    pub haltungshinweise: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FotoDto {
    pub beschriftung: String,
    pub content_type: String,
}
