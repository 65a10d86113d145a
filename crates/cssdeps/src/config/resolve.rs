use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::resolve::FsResolverOptions;

pub const MAX_RESOLVE_CONCURRENCY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveSettings {
    /// Prefix for root-relative (`/x`) URLs.
    pub root: Option<String>,
    /// `0` means unbounded.
    pub concurrency: usize,
    pub extensions: Vec<String>,
    pub modules: Vec<String>,
    pub main_files: Vec<String>,
    pub alias: BTreeMap<String, String>,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        let fs = FsResolverOptions::default();
        Self {
            root: None,
            concurrency: 0,
            extensions: fs.extensions,
            modules: fs.modules,
            main_files: fs.main_files,
            alias: fs.alias,
        }
    }
}

impl ResolveSettings {
    pub fn fs_options(&self) -> FsResolverOptions {
        FsResolverOptions {
            extensions: self.extensions.clone(),
            modules: self.modules.clone(),
            main_files: self.main_files.clone(),
            alias: self.alias.clone(),
        }
    }

    pub(crate) fn apply_patch(
        &mut self,
        patch: ResolveSettingsPatch,
    ) {
        if let Some(v) = patch.root {
            self.root = Some(v);
        }
        if let Some(v) = patch.concurrency {
            self.concurrency = v;
        }
        if let Some(v) = patch.extensions {
            self.extensions = v;
        }
        if let Some(v) = patch.modules {
            self.modules = v;
        }
        if let Some(v) = patch.main_files {
            self.main_files = v;
        }
        if let Some(v) = patch.alias {
            self.alias.extend(v);
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.concurrency = self.concurrency.min(MAX_RESOLVE_CONCURRENCY);
        if self.root.as_deref().is_some_and(|root| root.trim().is_empty()) {
            self.root = None;
        }
        for extension in &mut self.extensions {
            if !extension.is_empty() && !extension.starts_with('.') {
                extension.insert(0, '.');
            }
        }
        self.extensions.retain(|extension| !extension.is_empty());
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ResolveSettingsPatch {
    pub(crate) root: Option<String>,
    pub(crate) concurrency: Option<usize>,
    pub(crate) extensions: Option<Vec<String>>,
    pub(crate) modules: Option<Vec<String>>,
    pub(crate) main_files: Option<Vec<String>>,
    pub(crate) alias: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
