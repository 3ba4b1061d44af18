//! Settings resolution for the UIC service
//!
//! Each field resolves in priority order: command-line override,
//! then `UIC_*` environment variable, then compiled default. The
//! hashing salt is deliberately environment-only so it never shows
//! up in shell history or process listings.

use crate::{Error, Result};
use std::path::PathBuf;

/// Bot message language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    pub fn parse(s: &str) -> Result<Language> {
        match s {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => Err(Error::Config(format!("Unsupported language: {}", other))),
        }
    }
}

/// Command-line overrides collected by the binary's clap parser
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database_path: Option<PathBuf>,
    pub bind_addr: Option<String>,
}

/// Resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Secret salt for the keyed hash suffix (never part of the fingerprint)
    pub uic_salt: String,
    /// Minutes before an idle conversation session expires
    pub session_timeout_minutes: i64,
    /// Append the salted 5-hex suffix to the public code
    pub append_hash_suffix: bool,
    /// Language used for bot messages
    pub default_language: Language,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_DATABASE_PATH: &str = "./uic.db";
const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 15;

impl Settings {
    /// Resolve settings from CLI overrides, environment, and defaults
    pub fn load(overrides: Overrides) -> Result<Settings> {
        let bind_addr = overrides
            .bind_addr
            .or_else(|| std::env::var("UIC_BIND_ADDR").ok())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let database_path = overrides
            .database_path
            .or_else(|| std::env::var("UIC_DATABASE_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let uic_salt = std::env::var("UIC_SALT")
            .map_err(|_| Error::Config("UIC_SALT environment variable is required".to_string()))?;

        let session_timeout_minutes = match std::env::var("UIC_SESSION_TIMEOUT_MINUTES") {
            Ok(raw) => raw.parse::<i64>().map_err(|_| {
                Error::Config(format!("Invalid UIC_SESSION_TIMEOUT_MINUTES: {}", raw))
            })?,
            Err(_) => DEFAULT_SESSION_TIMEOUT_MINUTES,
        };

        let append_hash_suffix = match std::env::var("UIC_APPEND_HASH_SUFFIX") {
            Ok(raw) => matches!(raw.as_str(), "1" | "true" | "TRUE" | "yes"),
            Err(_) => false,
        };

        let default_language = match std::env::var("UIC_DEFAULT_LANGUAGE") {
            Ok(raw) => Language::parse(&raw)?,
            Err(_) => Language::Fr,
        };

        let settings = Settings {
            bind_addr,
            database_path,
            uic_salt,
            session_timeout_minutes,
            append_hash_suffix,
            default_language,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate resolved settings
    ///
    /// The salt rules match the deployment checklist: at least 16
    /// characters and not a single character class, so a leaked
    /// dictionary word cannot stand in for it.
    pub fn validate(&self) -> Result<()> {
        if self.uic_salt.len() < 16 {
            return Err(Error::Config(
                "UIC salt must be at least 16 characters long".to_string(),
            ));
        }
        let all_alpha = self.uic_salt.chars().all(|c| c.is_alphabetic());
        let all_digit = self.uic_salt.chars().all(|c| c.is_ascii_digit());
        if all_alpha || all_digit {
            return Err(Error::Config(
                "UIC salt should contain mixed character types".to_string(),
            ));
        }
        if !(1..=60).contains(&self.session_timeout_minutes) {
            return Err(Error::Config(format!(
                "Session timeout must be between 1 and 60 minutes, got {}",
                self.session_timeout_minutes
            )));
        }
        Ok(())
    }
}
