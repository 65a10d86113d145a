use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub enabled: bool,
    /// Regular expressions; an `@import` whose URL matches any of them is
    /// left in place.
    pub exclude: Vec<String>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude: Vec::new(),
        }
    }
}

impl ImportSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: ImportSettingsPatch,
    ) {
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.exclude {
            self.exclude = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.exclude.retain(|pattern| !pattern.trim().is_empty());
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ImportSettingsPatch {
    pub(crate) enabled: Option<bool>,
    pub(crate) exclude: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
