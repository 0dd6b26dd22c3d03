//! Constraint checks for incoming pet data.
//!
//! Every check appends a message instead of returning early, so a client
//! receives all violations of one request at once.

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::models::{
    Beschreibung, BeschreibungDto, Foto, FotoDto, Haustier, HaustierArt, HaustierDto,
    HaustierDtoOhneRef,
};

/// Maximum age in years
pub const MAX_AGE: i64 = 20;
pub const MAX_BESCHREIBUNG_LENGTH: usize = 100;
pub const MAX_BESCHRIFTUNG_LENGTH: usize = 32;
pub const MAX_CONTENT_TYPE_LENGTH: usize = 16;
/// `gewicht` and `groesse` are stored as NUMERIC(5,2)
pub const DECIMAL_SCALE: u32 = 2;
pub const DECIMAL_LIMIT: i64 = 1000;

lazy_static! {
    static ref NAME_PATTERN: Regex = Regex::new(r"^[A-ZÄÖÜ][a-zäöüß]+$").unwrap();
    static ref RASSE_PATTERN: Regex =
        Regex::new(r"^[A-ZÄÖÜ][a-zäöüß]+([ -][A-ZÄÖÜ][a-zäöüß]+)*$").unwrap();
    static ref BESCHREIBUNG_PATTERN: Regex = Regex::new(r"^\w.*").unwrap();
}

/// Parse an intake date given as ISO-8601 date or full RFC 3339 timestamp
pub fn parse_aufnahmedatum(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn check_decimal(field: &str, value: Decimal, violations: &mut Vec<String>) {
    if value <= Decimal::ZERO {
        violations.push(format!("{} muss positiv und groesser null sein.", field));
    }
    if value >= Decimal::from(DECIMAL_LIMIT) {
        violations.push(format!("{} muss kleiner als {} sein.", field, DECIMAL_LIMIT));
    }
    if value.normalize().scale() > DECIMAL_SCALE {
        violations.push(format!(
            "{} darf hoechstens {} Nachkommastellen haben.",
            field, DECIMAL_SCALE
        ));
    }
}

fn check_ohne_ref(dto: &HaustierDtoOhneRef, violations: &mut Vec<String>) {
    if !NAME_PATTERN.is_match(&dto.name) {
        violations.push(format!("name hat ein ungueltiges Format: {}", dto.name));
    }
    if !(0..=MAX_AGE).contains(&dto.alter) {
        violations.push(format!("alter muss zwischen 0 und {} liegen", MAX_AGE));
    }
    if dto.art.parse::<HaustierArt>().is_err() {
        violations.push("art muss HUND, KATZE oder KLEINTIER sein".to_string());
    }
    check_decimal("gewicht", dto.gewicht, violations);
    if let Some(groesse) = dto.groesse {
        check_decimal("groesse", groesse, violations);
    }
    if parse_aufnahmedatum(&dto.aufnahmedatum).is_none() {
        violations.push(format!(
            "aufnahmedatum ist kein ISO-8601-Datum: {}",
            dto.aufnahmedatum
        ));
    }
    if !RASSE_PATTERN.is_match(&dto.rasse) {
        violations.push(format!("rasse hat ein ungueltiges Format: {}", dto.rasse));
    }
    if let Some(schlagwoerter) = &dto.schlagwoerter {
        let unique: HashSet<&String> = schlagwoerter.iter().collect();
        if unique.len() != schlagwoerter.len() {
            violations.push("schlagwoerter muessen eindeutig sein".to_string());
        }
        if schlagwoerter.iter().any(|s| s.is_empty() || s.contains(',')) {
            violations.push("schlagwoerter duerfen nicht leer sein oder Kommas enthalten".to_string());
        }
    }
}

fn check_beschreibung(dto: &BeschreibungDto, violations: &mut Vec<String>) {
    if !BESCHREIBUNG_PATTERN.is_match(&dto.beschreibung) {
        violations.push("beschreibung muss mit einem Wortzeichen beginnen".to_string());
    }
    if dto.beschreibung.chars().count() > MAX_BESCHREIBUNG_LENGTH {
        violations.push(format!(
            "beschreibung darf hoechstens {} Zeichen lang sein",
            MAX_BESCHREIBUNG_LENGTH
        ));
    }
    if let Some(haltungshinweise) = &dto.haltungshinweise {
        if haltungshinweise.chars().count() > MAX_BESCHREIBUNG_LENGTH {
            violations.push(format!(
                "haltungshinweise darf hoechstens {} Zeichen lang sein",
                MAX_BESCHREIBUNG_LENGTH
            ));
        }
    }
}

fn check_foto(dto: &FotoDto, violations: &mut Vec<String>) {
    if dto.beschriftung.chars().count() > MAX_BESCHRIFTUNG_LENGTH {
        violations.push(format!(
            "beschriftung darf hoechstens {} Zeichen lang sein",
            MAX_BESCHRIFTUNG_LENGTH
        ));
    }
    if dto.content_type.chars().count() > MAX_CONTENT_TYPE_LENGTH {
        violations.push(format!(
            "contentType darf hoechstens {} Zeichen lang sein",
            MAX_CONTENT_TYPE_LENGTH
        ));
    }
}

fn into_result(violations: Vec<String>) -> AppResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!("validation failed: {:?}", violations);
        Err(AppError::Validation(violations))
    }
}

pub fn validate_haustier_ohne_ref(dto: &HaustierDtoOhneRef) -> AppResult<()> {
    let mut violations = Vec::new();
    check_ohne_ref(dto, &mut violations);
    into_result(violations)
}

pub fn validate_haustier(dto: &HaustierDto) -> AppResult<()> {
    let mut violations = Vec::new();
    check_ohne_ref(&dto.haustier, &mut violations);
    check_beschreibung(&dto.beschreibung, &mut violations);
    for foto in dto.fotos.iter().flatten() {
        check_foto(foto, &mut violations);
    }
    into_result(violations)
}

/// Convert validated scalar fields into an entity without references
pub fn haustier_from_dto_ohne_ref(dto: &HaustierDtoOhneRef) -> AppResult<Haustier> {
    validate_haustier_ohne_ref(dto)?;
    let art = dto.art.parse::<HaustierArt>().map_err(AppError::BadRequest)?;
    let aufnahmedatum = parse_aufnahmedatum(&dto.aufnahmedatum)
        .ok_or_else(|| AppError::BadRequest("Ungueltiges Aufnahmedatum".to_string()))?;

    Ok(Haustier {
        id: None,
        version: None,
        name: dto.name.clone(),
        alter: dto.alter as i32,
        art,
        gewicht: dto.gewicht,
        groesse: dto.groesse,
        vermittelt: dto.vermittelt,
        aufnahmedatum,
        rasse: dto.rasse.clone(),
        schlagwoerter: dto.schlagwoerter.clone().unwrap_or_default(),
        beschreibung: None,
        fotos: None,
        erzeugt: None,
        aktualisiert: None,
    })
}

/// Convert a validated create request into an entity with description and photos
pub fn haustier_from_dto(dto: &HaustierDto) -> AppResult<Haustier> {
    validate_haustier(dto)?;
    let mut haustier = haustier_from_dto_ohne_ref(&dto.haustier)?;
    haustier.beschreibung = Some(Beschreibung {
        id: None,
        beschreibung: dto.beschreibung.beschreibung.clone(),
        haltungshinweise: dto.beschreibung.haltungshinweise.clone(),
    });
    haustier.fotos = Some(
        dto.fotos
            .iter()
            .flatten()
            .map(|foto| Foto {
                id: None,
                beschriftung: foto.beschriftung.clone(),
                content_type: foto.content_type.clone(),
            })
            .collect(),
    );
    Ok(haustier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> HaustierDto {
        HaustierDto {
            haustier: HaustierDtoOhneRef {
                name: "Luna".to_string(),
                alter: 5,
                art: "HUND".to_string(),
                gewicht: Decimal::new(3055, 2),
                groesse: Some(Decimal::new(2345, 2)),
                vermittelt: false,
                aufnahmedatum: "2021-01-31".to_string(),
                rasse: "Golden Retriever".to_string(),
                schlagwoerter: Some(vec!["VERSPIELT".to_string()]),
            },
            beschreibung: BeschreibungDto {
                beschreibung: "Sehr verspielte Huendin".to_string(),
                haltungshinweise: Some("Braucht viel Auslauf".to_string()),
            },
            fotos: Some(vec![FotoDto {
                beschriftung: "Im Garten".to_string(),
                content_type: "image/png".to_string(),
            }]),
        }
    }

    #[test]
    fn test_valid_dto_passes() {
        assert!(validate_haustier(&valid_dto()).is_ok());
    }

    #[test]
    fn test_umlauts_in_name_and_rasse() {
        let mut dto = valid_dto();
        dto.haustier.name = "Öskar".to_string();
        dto.haustier.rasse = "Deutscher Schäferhund".to_string();
        assert!(validate_haustier(&dto).is_ok());
    }

    #[test]
    fn test_all_violations_are_reported() {
        let mut dto = valid_dto();
        dto.haustier.name = "luna".to_string();
        dto.haustier.alter = MAX_AGE + 1;
        dto.haustier.art = "PFERD".to_string();
        dto.haustier.gewicht = Decimal::ZERO;
        dto.haustier.aufnahmedatum = "31.01.2021".to_string();
        dto.haustier.schlagwoerter = Some(vec!["RUHIG".to_string(), "RUHIG".to_string()]);

        match validate_haustier(&dto) {
            Err(AppError::Validation(violations)) => assert_eq!(violations.len(), 6),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_decimal_precision_and_range() {
        let mut dto = valid_dto();
        dto.haustier.gewicht = Decimal::new(12345, 3);
        dto.haustier.groesse = Some(Decimal::new(123456789, 3));

        match validate_haustier(&dto) {
            Err(AppError::Validation(violations)) => {
                assert_eq!(violations.len(), 3);
                assert!(violations.iter().any(|v| v.starts_with("groesse muss kleiner")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        dto.haustier.gewicht = Decimal::new(99999, 2);
        dto.haustier.groesse = Some(Decimal::new(12500, 3));
        assert!(validate_haustier(&dto).is_ok());
    }

    #[test]
    fn test_nested_length_limits() {
        let mut dto = valid_dto();
        dto.beschreibung.beschreibung = "x".repeat(MAX_BESCHREIBUNG_LENGTH + 1);
        dto.fotos = Some(vec![FotoDto {
            beschriftung: "y".repeat(MAX_BESCHRIFTUNG_LENGTH + 1),
            content_type: "application/octet-stream".to_string(),
        }]);

        match validate_haustier(&dto) {
            Err(AppError::Validation(violations)) => assert_eq!(violations.len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_beschreibung_must_start_with_word_character() {
        let mut dto = valid_dto();
        dto.beschreibung.beschreibung = " leading space".to_string();
        assert!(validate_haustier(&dto).is_err());
    }

    #[test]
    fn test_parse_aufnahmedatum() {
        assert_eq!(
            parse_aufnahmedatum("2021-01-31"),
            NaiveDate::from_ymd_opt(2021, 1, 31)
        );
        assert_eq!(
            parse_aufnahmedatum("2021-01-31T10:00:00Z"),
            NaiveDate::from_ymd_opt(2021, 1, 31)
        );
        assert_eq!(parse_aufnahmedatum("2021-02-30"), None);
    }

    #[test]
    fn test_conversion_keeps_nested_entities() {
        let haustier = haustier_from_dto(&valid_dto()).unwrap();
        assert_eq!(haustier.art, HaustierArt::Hund);
        assert_eq!(haustier.schlagwoerter, vec!["VERSPIELT".to_string()]);
        assert_eq!(
            haustier.beschreibung.as_ref().unwrap().haltungshinweise.as_deref(),
            Some("Braucht viel Auslauf")
        );
        assert_eq!(haustier.fotos.as_ref().unwrap().len(), 1);
        assert!(haustier.id.is_none());
    }
}
