use std::collections::HashMap;

/// Prefix chain plus resolved target.
pub(crate) type ImportKey = (Option<String>, String);

/// Target with prefix, hash, needs-quotes.
pub(crate) type ReplacementKey = (String, String, bool);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportEntry {
    pub name: String,
    pub first_index: usize,
}

/// Distinct resolved imports of one namespace, numbered in insertion order.
#[derive(Debug)]
pub(crate) struct ImportTable {
    prefix: &'static str,
    entries: HashMap<ImportKey, ImportEntry>,
}

impl ImportTable {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            entries: HashMap::new(),
        }
    }

    /// The entry for `key`, and whether this call created it.
    pub fn intern(
        &mut self,
        key: ImportKey,
        index: usize,
    ) -> (ImportEntry, bool) {
        if let Some(entry) = self.entries.get(&key) {
            return (entry.clone(), false);
        }
        let entry = ImportEntry {
            name: format!("{}_{}___", self.prefix, self.entries.len()),
            first_index: index,
        };
        self.entries.insert(key, entry.clone());
        (entry, true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplacementEntry {
    pub name: String,
    pub import_name: String,
}

#[derive(Debug, Default)]
pub(crate) struct ReplacementTable {
    entries: HashMap<ReplacementKey, ReplacementEntry>,
}

impl ReplacementTable {
    pub fn intern(
        &mut self,
        key: ReplacementKey,
        import_name: &str,
    ) -> (ReplacementEntry, bool) {
        if let Some(entry) = self.entries.get(&key) {
            return (entry.clone(), false);
        }
        let entry = ReplacementEntry {
            name: format!("{REPLACEMENT_PREFIX}_{}___", self.entries.len()),
            import_name: import_name.to_string(),
        };
        self.entries.insert(key, entry.clone());
        (entry, true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub(crate) const AT_RULE_IMPORT_PREFIX: &str = "___CSS_LOADER_AT_RULE_IMPORT";
pub(crate) const URL_IMPORT_PREFIX: &str = "___CSS_LOADER_URL_IMPORT";
pub(crate) const REPLACEMENT_PREFIX: &str = "___CSS_LOADER_URL_REPLACEMENT";
pub(crate) const RUNTIME_HELPER_NAME: &str = "___CSS_LOADER_GET_URL_IMPORT___";

#[cfg(test)]
#[path = "../../tests/src/pass/table_tests.rs"]
mod tests;
