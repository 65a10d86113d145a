use std::collections::HashMap;

use serde::Deserialize;

use crate::extract::LiteralUrls;

#[derive(Debug, Clone, PartialEq)]
pub struct UrlSettings {
    pub enabled: bool,
    pub literal: LiteralUrls,
    /// Regular expressions; matching `url()` references are left in place.
    pub exclude: Vec<String>,
}

impl Default for UrlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            literal: LiteralUrls::Rewrite,
            exclude: Vec::new(),
        }
    }
}

impl UrlSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: UrlSettingsPatch,
    ) {
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.literal {
            self.literal = v;
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
pub(crate) struct UrlSettingsPatch {
    pub(crate) enabled: Option<bool>,
    pub(crate) literal: Option<LiteralUrls>,
    pub(crate) exclude: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
