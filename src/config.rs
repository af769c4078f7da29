use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

use crate::store::StoreBackend;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    // Row store
    pub store_backend: StoreBackend,
    pub sheet_id: Option<String>,
    pub sheet_name: String,
    pub sheets_api_base: String,
    pub credentials_file: PathBuf,
    pub database_url: Option<String>,
    pub table_name: String,

    /// Names offered by the submission form. Submissions are not checked
    /// against it.
    pub agents: Vec<String>,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_totals_per_min: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:5000".to_string(),
            api_prefix: String::new(),
            store_backend: StoreBackend::Sheets,
            sheet_id: None,
            sheet_name: "OT_Records".to_string(),
            sheets_api_base: crate::store::sheets::API_BASE.to_string(),
            credentials_file: PathBuf::from("credentials.json"),
            database_url: None,
            table_name: "ot_records".to_string(),
            agents: Vec::new(),
            rate_submit_per_min: 60,
            rate_totals_per_min: 120,
            log_dir: "logs".to_string(),
            log_level: tracing::Level::INFO,
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name}={raw:?} is invalid: {e}")),
        None => Ok(default),
    }
}

/// Comma separated, blanks dropped.
pub fn parse_roster(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        let config = Self {
            server_addr: var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: var("API_PREFIX").unwrap_or(defaults.api_prefix),

            store_backend: parsed("STORE_BACKEND", defaults.store_backend)?,
            sheet_id: var("GOOGLE_SHEET_ID"),
            sheet_name: var("SHEET_NAME").unwrap_or(defaults.sheet_name),
            sheets_api_base: var("SHEETS_API_BASE").unwrap_or(defaults.sheets_api_base),
            credentials_file: var("GOOGLE_CREDENTIALS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_file),
            database_url: var("DATABASE_URL"),
            table_name: var("TABLE_NAME").unwrap_or(defaults.table_name),

            agents: var("AGENTS").map(|r| parse_roster(&r)).unwrap_or_default(),

            rate_submit_per_min: parsed("RATE_SUBMIT_PER_MIN", defaults.rate_submit_per_min)?,
            rate_totals_per_min: parsed("RATE_TOTALS_PER_MIN", defaults.rate_totals_per_min)?,

            log_dir: var("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: parsed("LOG_LEVEL", defaults.log_level)?,
        };

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.table_name) {
            bail!("TABLE_NAME {:?} must be letters, digits and underscores", self.table_name);
        }
        if self.rate_submit_per_min == 0 || self.rate_totals_per_min == 0 {
            bail!("rate limits must be at least 1 request per minute");
        }
        if !(self.sheets_api_base.starts_with("https://")
            || self.sheets_api_base.starts_with("http://"))
        {
            bail!("SHEETS_API_BASE {:?} must be an http(s) url", self.sheets_api_base);
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            bail!("API_PREFIX {:?} must start with '/'", self.api_prefix);
        }
        Ok(())
    }
}
