// plugconf - Versioned configuration lifecycle manager for game-server plugins
//
// This is the library crate containing the config lifecycle core and the
// host-facing load/enable entry points. There is no binary: a host runtime
// loads the plugin and drives the two lifecycle phases.

pub mod comments;
pub mod lang;
pub mod logging;
pub mod models;
pub mod plugin;
pub mod store;
pub mod upgrade;
pub mod validation;

// Re-export commonly used types for convenience
pub use lang::{LocaleSelection, MessageCatalog, StaticCatalog};
pub use models::{ConfigDocument, ConfigValue};
pub use plugin::{HostEnv, PackagedResource, PluginState};
pub use store::{ConfigInitError, ConfigStore};
pub use upgrade::UpgradeDecision;
pub use validation::{ConfigValidationError, ValidationFailure};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
