use async_trait::async_trait;

use crate::error::AppResult;

/// Common trait for delete operations across different database backends
#[async_trait]
pub trait HaustierDeleter: Send + Sync {
    /// Delete a pet and its dependent rows in one transaction
    ///
    /// Returns true if the pet existed.
    async fn execute_haustier_delete(&self, id: i64) -> AppResult<bool>;
}

pub struct HaustierDeleteProcessor;

impl HaustierDeleteProcessor {
    /// Generated keys start at 1
    pub fn is_valid_id(id: i64) -> bool {
        id > 0
    }

    /// Dependent tables in the order they have to be cleared
    pub fn dependent_tables() -> &'static [&'static str] {
        &["beschreibung", "foto", "haustier_file"]
    }
}

/// Unified delete operations handler
pub struct UnifiedHaustierDeleteOps<T: HaustierDeleter> {
    deleter: T,
}

impl<T: HaustierDeleter> UnifiedHaustierDeleteOps<T> {
    pub fn new(deleter: T) -> Self {
        Self { deleter }
    }

    pub async fn delete_haustier(&self, id: i64) -> AppResult<bool> {
        if !HaustierDeleteProcessor::is_valid_id(id) {
            return Ok(false);
        }
        let deleted = self.deleter.execute_haustier_delete(id).await?;
        tracing::debug!("delete_haustier: id={}, deleted={}", id, deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_id() {
        assert!(HaustierDeleteProcessor::is_valid_id(1));
        assert!(!HaustierDeleteProcessor::is_valid_id(0));
        assert!(!HaustierDeleteProcessor::is_valid_id(-5));
    }

    #[test]
    fn test_haustier_table_is_not_a_dependent() {
        assert!(!HaustierDeleteProcessor::dependent_tables().contains(&"haustier"));
    }
}
