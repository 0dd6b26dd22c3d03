pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod extractors;
pub mod graphql;
pub mod logging;
pub mod mail;
pub mod models;
pub mod parser;
pub mod password;
pub mod resource;
pub mod service;
pub mod startup;
pub mod validation;

// Re-export commonly used types for easier access
pub use models::{Haustier, HaustierArt};
pub use service::HaustierService;
