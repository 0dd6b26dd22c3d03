use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::backend::HaustierBackend;
use crate::error::{AppError, AppResult};
use crate::mail::{new_haustier_body, new_haustier_subject, Mailer};
use crate::models::{Haustier, HaustierDto, HaustierDtoOhneRef, HaustierFile};
use crate::parser::{Pageable, Slice, Suchkriterien};
use crate::validation::{haustier_from_dto, haustier_from_dto_ohne_ref};

lazy_static! {
    static ref VERSION_PATTERN: Regex = Regex::new(r#"^"\d{1,3}"$"#).unwrap();
}

/// Parse an `If-Match` style version such as `"3"`
pub fn parse_version(version: &str) -> AppResult<i32> {
    if !VERSION_PATTERN.is_match(version) {
        tracing::debug!("invalid version {}", version);
        return Err(AppError::VersionInvalid(version.to_string()));
    }
    version
        .trim_matches('"')
        .parse::<i32>()
        .map_err(|_| AppError::VersionInvalid(version.to_string()))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Es gibt kein Haustier mit der ID {}.", id))
}

/// Read and write use cases shared by the REST and GraphQL interfaces
pub struct HaustierService {
    backend: Arc<dyn HaustierBackend>,
    mailer: Option<Arc<dyn Mailer>>,
    max_file_size: usize,
}

impl HaustierService {
    pub fn new(
        backend: Arc<dyn HaustierBackend>,
        mailer: Option<Arc<dyn Mailer>>,
        max_file_size: usize,
    ) -> Self {
        Self {
            backend,
            mailer,
            max_file_size,
        }
    }

    pub fn backend(&self) -> &Arc<dyn HaustierBackend> {
        &self.backend
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub async fn find_by_id(&self, id: i64, mit_fotos: bool) -> AppResult<Haustier> {
        tracing::debug!("find_by_id: id={}, mit_fotos={}", id, mit_fotos);
        self.backend
            .find_haustier_by_id(id, mit_fotos)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn find(
        &self,
        criteria: &Suchkriterien,
        pageable: &Pageable,
    ) -> AppResult<Slice<Haustier>> {
        tracing::debug!("find: criteria={:?}, pageable={:?}", criteria, pageable);
        let (content, total_elements) = self.backend.find_haustiere(criteria, pageable).await?;

        if content.is_empty() {
            let message = if criteria.is_empty() {
                format!("Ungueltige Seite \"{}\"", pageable.number)
            } else {
                "Keine Haustiere gefunden".to_string()
            };
            return Err(AppError::NotFound(message));
        }

        Ok(Slice {
            content,
            total_elements,
        })
    }

    pub async fn find_file(&self, haustier_id: i64) -> AppResult<Option<HaustierFile>> {
        tracing::debug!("find_file: haustier_id={}", haustier_id);
        self.backend.find_file_by_haustier_id(haustier_id).await
    }

    /// Store a new pet and notify; returns the generated ID
    pub async fn create(&self, dto: &HaustierDto) -> AppResult<i64> {
        let haustier = haustier_from_dto(dto)?;
        tracing::debug!("create: haustier={:?}", haustier);

        if self.backend.exists_by_name(&haustier.name, None).await? {
            return Err(AppError::NameExists(haustier.name));
        }

        let id = self.backend.create_haustier(&haustier).await?;
        self.send_mail(id, &haustier).await;

        tracing::debug!("create: id={}", id);
        Ok(id)
    }

    async fn send_mail(&self, id: i64, haustier: &Haustier) {
        let Some(mailer) = &self.mailer else {
            return;
        };
        let beschreibung = haustier
            .beschreibung
            .as_ref()
            .map(|b| b.beschreibung.as_str())
            .unwrap_or("N/A");

        if let Err(e) = mailer
            .send(&new_haustier_subject(id), &new_haustier_body(beschreibung))
            .await
        {
            tracing::warn!("mail notification for {} failed: {}", id, e);
        }
    }

    /// Attach a binary file to an existing pet, replacing a previous one
    pub async fn add_file(
        &self,
        haustier_id: i64,
        data: Vec<u8>,
        filename: &str,
        mimetype: Option<&str>,
    ) -> AppResult<()> {
        tracing::debug!(
            "add_file: haustier_id={}, filename={}, size={}",
            haustier_id,
            filename,
            data.len()
        );

        if data.len() > self.max_file_size {
            return Err(AppError::PayloadTooLarge(self.max_file_size));
        }
        if self
            .backend
            .find_haustier_by_id(haustier_id, false)
            .await?
            .is_none()
        {
            return Err(not_found(haustier_id));
        }

        let file = HaustierFile {
            id: None,
            filename: filename.to_string(),
            mimetype: mimetype.unwrap_or_default().to_string(),
            data,
        };
        self.backend.replace_file(haustier_id, &file).await
    }

    /// Update the scalar fields; returns the new version
    pub async fn update(
        &self,
        id: i64,
        dto: &HaustierDtoOhneRef,
        version: &str,
    ) -> AppResult<i32> {
        tracing::debug!("update: id={}, version={}", id, version);
        let haustier = haustier_from_dto_ohne_ref(dto)?;
        let expected_version = parse_version(version)?;

        let current = self
            .backend
            .find_haustier_by_id(id, false)
            .await?
            .ok_or_else(|| not_found(id))?;
        if current.version != Some(expected_version) {
            tracing::debug!(
                "update: stored version {:?}, requested {}",
                current.version,
                expected_version
            );
            return Err(AppError::VersionOutdated(expected_version));
        }

        if self.backend.exists_by_name(&haustier.name, Some(id)).await? {
            return Err(AppError::NameExists(haustier.name));
        }

        // A concurrent update may have bumped the version since the read above
        let new_version = self
            .backend
            .update_haustier(id, expected_version, &haustier)
            .await?
            .ok_or(AppError::VersionOutdated(expected_version))?;

        tracing::debug!("update: new version={}", new_version);
        Ok(new_version)
    }

    /// Remove a pet with all dependent data; `false` if it did not exist
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        tracing::debug!("delete: id={}", id);
        self.backend.delete_haustier(id).await
    }
}
