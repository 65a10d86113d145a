pub mod config;
pub mod extract;
pub mod pass;
pub mod request;
pub mod resolve;
pub mod syntax;
pub mod text_pos;
pub mod value;

pub use config::{ConfigError, Settings, UrlStyle};
pub use extract::{ExtractSettings, Extraction, FilterInput, LiteralUrls, Reference, ReferenceFilter, Warning, WarningKind, extract};
pub use pass::{
    DEFAULT_RUNTIME_HELPER, Descriptor, ImportNamespace, Pass, PassError, PassOptions, PassOutput, UrlHandler,
    UsageOrigin, relative_url_handler,
};
pub use resolve::{FsResolver, FsResolverOptions, ResolveError, Resolver};
pub use syntax::Stylesheet;
