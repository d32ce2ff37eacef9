//! Configuration for the Finance Agent CLI

use anyhow::{Context, Result};
use finance_core::aggregate::{BUCKET_LIMIT, CATEGORY_LIMIT};
use finance_core::{AggregateOptions, BucketWindow};
use serde::Deserialize;
use std::path::Path;

use crate::constants;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub platform: PlatformSection,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub dashboard: DashboardSection,
}

/// Hosted platform project
#[derive(Debug, Default, Deserialize)]
pub struct PlatformSection {
    /// Project URL, e.g. https://abc.supabase.co
    pub url: Option<String>,
    /// Public (anon) API key
    pub anon_key: Option<String>,
}

/// Credentials; an access token wins over email/password
#[derive(Debug, Default, Deserialize)]
pub struct AuthSection {
    pub access_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Dashboard tuning
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSection {
    /// Rows fetched from financial_data
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    /// Categories shown in the category chart
    #[serde(default = "default_category_limit")]
    pub category_limit: usize,
    /// Days shown in the income/expense chart
    #[serde(default = "default_bucket_limit")]
    pub bucket_limit: usize,
    /// Sort days by date instead of relying on fetch order
    #[serde(default)]
    pub chronological: bool,
}

fn default_fetch_limit() -> usize {
    constants::DEFAULT_FETCH_LIMIT
}

fn default_category_limit() -> usize {
    CATEGORY_LIMIT
}

fn default_bucket_limit() -> usize {
    BUCKET_LIMIT
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            category_limit: default_category_limit(),
            bucket_limit: default_bucket_limit(),
            chronological: false,
        }
    }
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse {}. Check for:\n\
                 - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
                 - Incorrect data types (strings vs numbers)\n\n\
                 See config.toml.example for the expected format.",
                path.display()
            )
        })
    }

    /// Load the file if it exists; environment variables can stand in for it
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using environment only");
            Ok(Self::default())
        }
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Resolved configuration (file values with environment overrides applied)
#[derive(Debug)]
pub struct Config {
    pub platform_url: Option<String>,
    pub anon_key: Option<String>,
    pub access_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub dashboard: DashboardSection,
}

impl Config {
    /// Apply process environment overrides to the file config
    pub fn from_file(file_config: FileConfig) -> Self {
        Self::resolve(file_config, |key| std::env::var(key).ok())
    }

    /// Apply overrides from `env`; blank values count as unset
    pub fn resolve(file_config: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str, fallback: Option<String>| {
            env(key)
                .or(fallback)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            platform_url: lookup(constants::ENV_PLATFORM_URL, file_config.platform.url)
                .map(|u| u.trim_end_matches('/').to_string()),
            anon_key: lookup(constants::ENV_ANON_KEY, file_config.platform.anon_key),
            access_token: lookup(constants::ENV_ACCESS_TOKEN, file_config.auth.access_token),
            email: lookup(constants::ENV_EMAIL, file_config.auth.email),
            password: lookup(constants::ENV_PASSWORD, file_config.auth.password),
            dashboard: file_config.dashboard,
        }
    }

    /// Platform URL and anon key, or a setup hint when either is missing
    pub fn platform_credentials(&self) -> Result<(&str, &str)> {
        match (self.platform_url.as_deref(), self.anon_key.as_deref()) {
            (Some(url), Some(key)) => Ok((url, key)),
            _ => anyhow::bail!(
                "Platform is not configured.\n\n\
                To get started, either:\n\
                1. Copy config.toml.example to config.toml and fill in [platform] url and anon_key, or\n\
                2. Set {} and {} in the environment.",
                constants::ENV_PLATFORM_URL,
                constants::ENV_ANON_KEY
            ),
        }
    }

    /// Values that look like template leftovers
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, value) in [
            ("platform URL", &self.platform_url),
            ("anon key", &self.anon_key),
        ] {
            if value.as_deref().is_some_and(|v| v.contains("placeholder")) {
                warnings.push(format!(
                    "Invalid platform configuration: {} is still a placeholder",
                    name
                ));
            }
        }
        warnings
    }

    /// Aggregation settings; the CLI flag can only switch chronological on
    pub fn aggregate_options(&self, chronological: bool) -> AggregateOptions {
        AggregateOptions {
            category_limit: self.dashboard.category_limit,
            bucket_limit: self.dashboard.bucket_limit,
            window: if chronological || self.dashboard.chronological {
                BucketWindow::Chronological
            } else {
                BucketWindow::InputOrder
            },
        }
    }
}
