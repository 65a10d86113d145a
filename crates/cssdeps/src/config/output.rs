use std::collections::HashMap;

use serde::Deserialize;

use crate::pass::DEFAULT_RUNTIME_HELPER;

/// How resolved targets are written into import bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UrlStyle {
    #[default]
    Absolute,
    /// Relative to the stylesheet's directory.
    Relative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub url_style: UrlStyle,
    pub runtime_helper: String,
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            url_style: UrlStyle::Absolute,
            runtime_helper: DEFAULT_RUNTIME_HELPER.to_string(),
            pretty: false,
        }
    }
}

impl OutputSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: OutputSettingsPatch,
    ) {
        if let Some(v) = patch.url_style {
            self.url_style = v;
        }
        if let Some(v) = patch.runtime_helper {
            self.runtime_helper = v;
        }
        if let Some(v) = patch.pretty {
            self.pretty = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        if self.runtime_helper.trim().is_empty() {
            self.runtime_helper = DEFAULT_RUNTIME_HELPER.to_string();
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct OutputSettingsPatch {
    pub(crate) url_style: Option<UrlStyle>,
    pub(crate) runtime_helper: Option<String>,
    pub(crate) pretty: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
