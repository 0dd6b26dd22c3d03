use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::{
    Beschreibung, BeschreibungDto, Foto, FotoDto, Haustier, HaustierArt, HaustierDto,
    HaustierDtoOhneRef,
};
use crate::parser::Suchkriterien;

#[derive(SimpleObject)]
#[graphql(name = "Haustier")]
pub struct HaustierObject {
    pub id: ID,
    pub version: i32,
    pub name: String,
    pub alter: i32,
    pub art: HaustierArt,
    pub gewicht: Decimal,
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: NaiveDate,
    pub rasse: String,
    pub schlagwoerter: Vec<String>,
    pub beschreibung: Option<Beschreibung>,
    pub fotos: Vec<Foto>,
    pub erzeugt: Option<DateTime<Utc>>,
    pub aktualisiert: Option<DateTime<Utc>>,
}

impl From<Haustier> for HaustierObject {
    fn from(haustier: Haustier) -> Self {
        Self {
            id: ID::from(haustier.id.unwrap_or_default().to_string()),
            version: haustier.version.unwrap_or_default(),
            name: haustier.name,
            alter: haustier.alter,
            art: haustier.art,
            gewicht: haustier.gewicht,
            groesse: haustier.groesse,
            vermittelt: haustier.vermittelt,
            aufnahmedatum: haustier.aufnahmedatum,
            rasse: haustier.rasse,
            schlagwoerter: haustier.schlagwoerter,
            beschreibung: haustier.beschreibung,
            fotos: haustier.fotos.unwrap_or_default(),
            erzeugt: haustier.erzeugt,
            aktualisiert: haustier.aktualisiert,
        }
    }
}

#[derive(SimpleObject)]
pub struct CreatePayload {
    pub id: i64,
}

#[derive(SimpleObject)]
pub struct UpdatePayload {
    pub version: i32,
}

#[derive(InputObject)]
pub struct BeschreibungInput {
    pub beschreibung: String,
    pub haltungshinweise: Option<String>,
}

#[derive(InputObject)]
pub struct FotoInput {
    pub beschriftung: String,
    pub content_type: String,
}

#[derive(InputObject)]
pub struct HaustierInput {
    pub name: String,
    pub alter: i32,
    pub art: HaustierArt,
    pub gewicht: Decimal,
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: String,
    pub rasse: String,
    pub schlagwoerter: Option<Vec<String>>,
    pub beschreibung: BeschreibungInput,
    pub fotos: Option<Vec<FotoInput>>,
}

impl From<HaustierInput> for HaustierDto {
    fn from(input: HaustierInput) -> Self {
        HaustierDto {
            haustier: HaustierDtoOhneRef {
                name: input.name,
                alter: i64::from(input.alter),
                art: input.art.to_string(),
                gewicht: input.gewicht,
                groesse: input.groesse,
                vermittelt: input.vermittelt,
                aufnahmedatum: input.aufnahmedatum,
                rasse: input.rasse,
                schlagwoerter: input.schlagwoerter,
            },
            beschreibung: BeschreibungDto {
                beschreibung: input.beschreibung.beschreibung,
                haltungshinweise: input.beschreibung.haltungshinweise,
            },
            fotos: input.fotos.map(|fotos| {
                fotos
                    .into_iter()
                    .map(|foto| FotoDto {
                        beschriftung: foto.beschriftung,
                        content_type: foto.content_type,
                    })
                    .collect()
            }),
        }
    }
}

#[derive(InputObject)]
pub struct HaustierUpdateInput {
    pub id: ID,
    #[graphql(validator(minimum = 0))]
    pub version: i32,
    pub name: String,
    pub alter: i32,
    pub art: HaustierArt,
    pub gewicht: Decimal,
    pub groesse: Option<Decimal>,
    pub vermittelt: bool,
    pub aufnahmedatum: String,
    pub rasse: String,
    pub schlagwoerter: Option<Vec<String>>,
}

impl HaustierUpdateInput {
    pub fn to_dto(&self) -> HaustierDtoOhneRef {
        HaustierDtoOhneRef {
            name: self.name.clone(),
            alter: i64::from(self.alter),
            art: self.art.to_string(),
            gewicht: self.gewicht,
            groesse: self.groesse,
            vermittelt: self.vermittelt,
            aufnahmedatum: self.aufnahmedatum.clone(),
            rasse: self.rasse.clone(),
            schlagwoerter: self.schlagwoerter.clone(),
        }
    }
}

#[derive(InputObject, Default)]
pub struct SuchkriterienInput {
    pub name: Option<String>,
    pub alter: Option<i32>,
    pub art: Option<HaustierArt>,
    pub gewicht: Option<Decimal>,
    pub groesse: Option<Decimal>,
    pub vermittelt: Option<bool>,
    pub aufnahmedatum: Option<NaiveDate>,
    pub rasse: Option<String>,
    pub verspielt: Option<bool>,
    pub ruhig: Option<bool>,
    pub beschreibung: Option<String>,
}

impl From<SuchkriterienInput> for Suchkriterien {
    fn from(input: SuchkriterienInput) -> Self {
        Suchkriterien {
            name: input.name,
            alter: input.alter,
            art: input.art,
            gewicht: input.gewicht,
            groesse: input.groesse,
            vermittelt: input.vermittelt,
            aufnahmedatum: input.aufnahmedatum,
            rasse: input.rasse,
            verspielt: input.verspielt.unwrap_or(false),
            ruhig: input.ruhig.unwrap_or(false),
            beschreibung: input.beschreibung,
        }
    }
}
