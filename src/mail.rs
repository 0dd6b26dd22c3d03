use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MailConfig;
use crate::error::AppResult;

/// Outgoing notification channel
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> AppResult<()>;
}

/// Records notifications in the `mail` log target instead of delivering them
pub struct LogMailer {
    from: String,
    to: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, subject: &str, body: &str) -> AppResult<()> {
        tracing::info!(
            target: "mail",
            from = %self.from,
            to = %self.to,
            "{}: {}",
            subject,
            body
        );
        Ok(())
    }
}

/// Mailer for the configuration; `None` when notifications are disabled
pub fn create_mailer(config: &MailConfig) -> Option<Arc<dyn Mailer>> {
    if config.enabled {
        Some(Arc::new(LogMailer::new(&config.from, &config.to)))
    } else {
        tracing::debug!("mail notifications disabled");
        None
    }
}

pub fn new_haustier_subject(id: i64) -> String {
    format!("Neues Haustier {}", id)
}

pub fn new_haustier_body(beschreibung: &str) -> String {
    format!(
        "Das Haustier mit der Beschreibung <strong>{}</strong> ist angelegt",
        beschreibung
    )
}
