//! `cssdeps.toml` configuration.
//!
//! Settings are split into one file per category. [`Settings`] aggregates
//! all categories; each category is read through a private `*Patch` struct
//! so partial files only override what they name and unknown keys are
//! ignored.

pub(crate) mod import;
pub(crate) mod logging;
pub(crate) mod output;
pub(crate) mod resolve;
pub(crate) mod url;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use import::ImportSettings;
use import::ImportSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use logging::LoggingSettingsPatch;
pub use output::{OutputSettings, UrlStyle};
use output::OutputSettingsPatch;
use regex::RegexSet;
pub use resolve::{MAX_RESOLVE_CONCURRENCY, ResolveSettings};
use resolve::ResolveSettingsPatch;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
pub use self::url::UrlSettings;
use self::url::UrlSettingsPatch;

use crate::extract::{FilterInput, ReferenceFilter};
use crate::pass::{PassOptions, relative_url_handler};

pub const CONFIG_FILENAME: &str = "cssdeps.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub import: ImportSettings,
    pub url: UrlSettings,
    pub resolve: ResolveSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let patch: SettingsPatch = toml::from_str(content)?;
        let mut settings = Self::default();
        settings.apply_patch(patch);
        settings.normalize();
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from the nearest `cssdeps.toml` above `start`, or defaults.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        match find_config_file(start) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Options for a pass over a stylesheet living in `context`.
    pub fn to_pass_options(
        &self,
        context: &Path,
    ) -> Result<PassOptions, ConfigError> {
        let url_handler = match self.output.url_style {
            UrlStyle::Absolute => None,
            UrlStyle::Relative => Some(relative_url_handler(context.to_path_buf())),
        };
        Ok(PassOptions {
            context: context.to_path_buf(),
            root_context: self.resolve.root.clone(),
            import: self.import.enabled,
            url: self.url.enabled,
            literal_urls: self.url.literal,
            runtime_helper: self.output.runtime_helper.clone(),
            concurrency: self.resolve.concurrency,
            filter: exclude_filter(&self.import.exclude, &self.url.exclude)?,
            url_handler,
        })
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) {
        if let Some(p) = patch.import {
            self.import.apply_patch(p);
        }
        if let Some(p) = patch.url {
            self.url.apply_patch(p);
        }
        if let Some(p) = patch.resolve {
            self.resolve.apply_patch(p);
        }
        if let Some(p) = patch.output {
            self.output.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.import.normalize();
        self.url.normalize();
        self.resolve.normalize();
        self.output.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct SettingsPatch {
    import: Option<ImportSettingsPatch>,
    url: Option<UrlSettingsPatch>,
    resolve: Option<ResolveSettingsPatch>,
    output: Option<OutputSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, toml::Value>,
}

/// Walks parent directories from `start` looking for `cssdeps.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Rejects `@import`s matching `import` and `url()`s matching `url`.
fn exclude_filter(
    import: &[String],
    url: &[String],
) -> Result<Option<ReferenceFilter>, ConfigError> {
    if import.is_empty() && url.is_empty() {
        return Ok(None);
    }
    let import = RegexSet::new(import)?;
    let url = RegexSet::new(url)?;
    let filter: ReferenceFilter = Arc::new(move |input: &FilterInput<'_>| {
        let excluded = if input.media.is_some() { &import } else { &url };
        !excluded.is_match(input.url)
    });
    Ok(Some(filter))
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
