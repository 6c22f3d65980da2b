//! Locale-aware message catalog access.
//!
//! The crate only *consumes* translations: [`MessageCatalog`] is the single
//! lookup operation the lifecycle needs, and hosts that load real translation
//! files implement it themselves. [`StaticCatalog`] is a small in-memory
//! implementation with fallback-locale chaining, enough for embedding and for
//! tests.

use camino::Utf8PathBuf;
use indexmap::IndexMap;

/// Message identifiers the lifecycle resolves against the catalog.
pub mod keys {
    /// License notice logged once the plugin is enabled. Args: plugin name.
    pub const PLUGIN_LICENSE: &str = "plugin.license";
    /// Logged after locale selection. Args: selected locale.
    pub const LANGUAGE_SELECTED: &str = "language.selected";
    /// Logged when the bundled config is malformed.
    pub const CONFIG_LOAD_ERROR: &str = "config.load.error";
    /// Logged when the stored config is older than the bundled schema.
    pub const CONFIG_VERSION_UPDATE_AVAILABLE: &str = "config.version.update.available";
    /// Logged after a successful defaults-forward merge.
    pub const CONFIG_VERSION_UPDATE_SUCCESS: &str = "config.version.update.success";
    /// Logged when the stored config is newer than the bundled schema.
    pub const CONFIG_VERSION_UNKNOWN: &str = "config.version.unknown";
    /// Logged when the stored config matches the bundled schema.
    pub const CONFIG_VERSION_LATEST: &str = "config.version.latest";
}

/// Locale used when the requested one cannot resolve a key.
pub const FALLBACK_LOCALE: &str = "en";

/// Sentinel `lang` value meaning "use the host's configured language".
pub const DEFAULT_LANG_SENTINEL: &str = "default";

/// Lookup-only view of a locale-selected translation table.
///
/// `resolve` substitutes positional `{0}`, `{1}`, ... placeholders with
/// `args` and returns the key itself when no catalog entry exists; that
/// convention is what keeps comment-key resolution convergent when a
/// translation is missing.
#[cfg_attr(test, mockall::automock)]
pub trait MessageCatalog {
    fn resolve(&self, key: &str, args: &[String]) -> String;
}

/// The language identifier resolved at startup, held for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSelection {
    /// Locale requested by the user config (after the `"default"` sentinel
    /// has been replaced with the host language).
    pub requested: String,
    /// Fixed fallback locale.
    pub fallback: String,
    /// Directory of packaged per-locale catalog files, when the host package
    /// ships any.
    pub locale_dir: Option<Utf8PathBuf>,
}

impl LocaleSelection {
    pub fn new(requested: impl Into<String>, locale_dir: Option<Utf8PathBuf>) -> Self {
        Self {
            requested: requested.into(),
            fallback: FALLBACK_LOCALE.to_string(),
            locale_dir,
        }
    }
}

/// In-memory [`MessageCatalog`] keyed by locale.
///
/// Lookup order: requested locale, then the fallback locale, then the key
/// itself.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    locale: String,
    fallback: String,
    tables: IndexMap<String, IndexMap<String, String>>,
}

impl StaticCatalog {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            fallback: FALLBACK_LOCALE.to_string(),
            tables: IndexMap::new(),
        }
    }

    /// Add or extend the translation table for one locale.
    pub fn with_table<K, V>(
        mut self,
        locale: impl Into<String>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.tables.entry(locale.into()).or_default();
        for (key, template) in entries {
            table.insert(key.into(), template.into());
        }
        self
    }

    /// The locale this catalog resolves against first.
    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl MessageCatalog for StaticCatalog {
    fn resolve(&self, key: &str, args: &[String]) -> String {
        let template = self
            .tables
            .get(&self.locale)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(&self.fallback)
                    .and_then(|table| table.get(key))
            });

        let Some(template) = template else {
            return key.to_string();
        };

        let mut message = template.clone();
        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), arg);
        }
        message
    }
}
