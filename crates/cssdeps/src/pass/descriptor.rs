use serde::Serialize;

/// Which identifier namespace an import binding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportNamespace {
    AtRule,
    Url,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UsageOrigin {
    /// Bound to a resolved `import-binding`.
    Internal { import_name: String },
    /// An import that is left to the consumer as written.
    External { url: String },
}

/// One dependency record emitted by a pass, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Descriptor {
    ImportBinding {
        import_name: String,
        url: String,
        index: usize,
        namespace: ImportNamespace,
    },
    ImportUsage {
        index: usize,
        media: String,
        origin: UsageOrigin,
    },
    UrlReplacement {
        replacement_name: String,
        import_name: String,
        hash: String,
        needs_quotes: bool,
        index: usize,
    },
}

impl Descriptor {
    pub fn index(&self) -> usize {
        match self {
            Descriptor::ImportBinding {
                index,
                ..
            }
            | Descriptor::ImportUsage {
                index,
                ..
            }
            | Descriptor::UrlReplacement {
                index,
                ..
            } => *index,
        }
    }
}
