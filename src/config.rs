use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::auth::Role;
use crate::backend::database::DatabaseBackendConfig;
use crate::backend::DatabaseType;

pub const DEFAULT_MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Fixed external base URL for `Location` headers; derived from the
    /// request headers when absent
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    #[serde(rename = "type")]
    pub backend_type: String,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: String,
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub users: Vec<UserConfig>,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

/// HTTP Basic credentials; `password` is an Argon2id/bcrypt hash or plain text
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenConfig {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

fn default_max_file_size() -> usize {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailConfig {
    #[serde(default = "default_mail_enabled")]
    pub enabled: bool,
    #[serde(default = "default_mail_from")]
    pub from: String,
    #[serde(default = "default_mail_to")]
    pub to: String,
}

fn default_mail_enabled() -> bool {
    true
}

fn default_mail_from() -> String {
    "haustier@acme.com".to_string()
}

fn default_mail_to() -> String {
    "admin@acme.com".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: default_mail_enabled(),
            from: default_mail_from(),
            to: default_mail_to(),
        }
    }
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, String> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(format!("Configuration file not found: {}", path.display()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let expanded_content = Self::expand_env_vars(&content)?;

        let app_config: AppConfig = serde_yaml::from_str(&expanded_content)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Development configuration: in-memory SQLite and two sample accounts
    pub fn default_config() -> Self {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                base_url: None,
            },
            backend: BackendConfig {
                backend_type: "database".to_string(),
                database: Some(DatabaseConfig {
                    db_type: "sqlite".to_string(),
                    url: "sqlite::memory:".to_string(),
                    max_connections: 1,
                }),
            },
            auth: AuthConfig {
                users: vec![
                    UserConfig {
                        username: "admin".to_string(),
                        password: "p".to_string(),
                        roles: vec!["admin".to_string(), "user".to_string()],
                    },
                    UserConfig {
                        username: "user".to_string(),
                        password: "p".to_string(),
                        roles: vec!["user".to_string()],
                    },
                ],
                tokens: Vec::new(),
            },
            upload: UploadConfig::default(),
            mail: MailConfig::default(),
        }
    }

    /// Expand environment variables in format ${VAR_NAME} or ${VAR_NAME:-default}
    fn expand_env_vars(content: &str) -> Result<String, String> {
        let mut expanded = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            expanded.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                expanded.push_str(&rest[start..]);
                return Ok(expanded);
            };

            let var_expr = &after[..end];
            let (var_name, default_value) = match var_expr.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (var_expr, None),
            };

            let value = match (std::env::var(var_name), default_value) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.to_string(),
                (Err(_), None) => {
                    return Err(format!(
                        "Environment variable {} not found and no default provided",
                        var_name
                    ))
                }
            };

            expanded.push_str(&value);
            rest = &after[end + 1..];
        }

        expanded.push_str(rest);
        Ok(expanded)
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.backend.backend_type != "database" {
            return Err(format!(
                "Unsupported backend type: {}",
                self.backend.backend_type
            ));
        }
        self.database_backend_config()?.validate()?;

        if let Some(base_url) = &self.server.base_url {
            url::Url::parse(base_url).map_err(|e| format!("Invalid base_url {}: {}", base_url, e))?;
        }

        for user in &self.auth.users {
            if user.username.is_empty() || user.password.is_empty() {
                return Err("Users need a username and a password".to_string());
            }
            Self::validate_roles(&user.username, &user.roles)?;
        }
        for token in &self.auth.tokens {
            if token.token.is_empty() || token.username.is_empty() {
                return Err("Tokens need a token value and a username".to_string());
            }
            Self::validate_roles(&token.username, &token.roles)?;
        }

        if self.upload.max_file_size == 0 {
            return Err("upload.max_file_size must be greater than 0".to_string());
        }

        if self.mail.enabled {
            for address in [&self.mail.from, &self.mail.to] {
                if !email_address::EmailAddress::is_valid(address) {
                    return Err(format!("Invalid mail address: {}", address));
                }
            }
        }

        Ok(())
    }

    fn validate_roles(username: &str, roles: &[String]) -> Result<(), String> {
        for role in roles {
            if role.parse::<Role>().is_err() {
                return Err(format!("Unknown role {} for {}", role, username));
            }
        }
        Ok(())
    }

    /// Connection settings for the storage backend
    pub fn database_backend_config(&self) -> Result<DatabaseBackendConfig, String> {
        let database = self
            .backend
            .database
            .as_ref()
            .ok_or_else(|| "Database configuration is required for the database backend".to_string())?;

        let database_type = DatabaseType::parse(&database.db_type)
            .ok_or_else(|| format!("Unsupported database type: {}", database.db_type))?;

        Ok(DatabaseBackendConfig::new(database_type, database.url.clone())
            .with_max_connections(database.max_connections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("HAUSTIER_TEST_PORT", "8080");

        let expanded =
            AppConfig::expand_env_vars("port: ${HAUSTIER_TEST_PORT:-3000}\nhost: \"${HAUSTIER_MISSING:-localhost}\"")
                .unwrap();
        assert_eq!(expanded, "port: 8080\nhost: \"localhost\"");

        assert!(AppConfig::expand_env_vars("url: ${HAUSTIER_MISSING}").is_err());
        assert_eq!(AppConfig::expand_env_vars("a ${b").unwrap(), "a ${b");

        std::env::remove_var("HAUSTIER_TEST_PORT");
    }

    #[test]
    fn test_config_file_loading() {
        let config_content = r#"
server:
  host: "0.0.0.0"
  port: 8080

backend:
  type: "database"
  database:
    type: "postgresql"
    url: "${HAUSTIER_DB_URL:-postgres://localhost/haustier}"

auth:
  users:
    - username: admin
      password: p
      roles: [admin, user]
  tokens:
    - token: "secret"
      username: admin
      roles: [admin]

upload:
  max_file_size: 1024

mail:
  enabled: false
"#;

        let temp_file = std::env::temp_dir().join("haustier_test_config.yaml");
        std::fs::write(&temp_file, config_content).unwrap();

        let config = AppConfig::load_from_file(&temp_file).unwrap();

        assert_eq!(config.server.port, 8080);
        let db_config = config.database_backend_config().unwrap();
        assert_eq!(db_config.database_type, DatabaseType::PostgreSQL);
        assert_eq!(db_config.connection_url, "postgres://localhost/haustier");
        assert_eq!(config.auth.users.len(), 1);
        assert_eq!(config.auth.tokens[0].token, "secret");
        assert_eq!(config.upload.max_file_size, 1024);
        assert!(!config.mail.enabled);

        std::fs::remove_file(temp_file).unwrap();
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file("/nonexistent/path/config.yaml");
        assert!(result.unwrap_err().contains("Configuration file not found"));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default_config();

        assert!(config.validate().is_ok());
        assert_eq!(config.upload.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(config.mail.enabled);
        assert!(config.database_backend_config().unwrap().is_memory_database());
        assert_eq!(config.auth.users.len(), 2);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AppConfig::default_config();
        config.backend.backend_type = "ldap".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        if let Some(database) = config.backend.database.as_mut() {
            database.db_type = "oracle".to_string();
        }
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.auth.users[0].roles.push("root".to_string());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.upload.max_file_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.mail.to = "no-address".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.server.base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }
}
