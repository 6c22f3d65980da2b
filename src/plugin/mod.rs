//! Host-facing plugin lifecycle.
//!
//! The host runtime drives two phases, in order, on one thread:
//!
//! 1. [`load`]: filesystem and config bring-up, locale resource discovery,
//!    first-run seeding, load, validate, coerce, locale selection. No catalog
//!    exists yet, so all failures here log in plain text.
//! 2. [`enable`]: everything that needs the message catalog, meaning the
//!    version check and defaults-forward merge, comment-key localization,
//!    and the license notice.
//!
//! All host collaborators arrive as explicit [`HostEnv`] fields; the crate
//! holds no global state.

use crate::comments::resolve_comments;
use crate::lang::{self, LocaleSelection, MessageCatalog, keys};
use crate::models::{ConfigValue, FIELD_LANG};
use crate::store::ConfigStore;
use crate::upgrade;
use crate::validation::{self, ConfigValidationError};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Directory name, under both the data folder and the packaged resources,
/// holding per-locale catalog files.
pub const LOCALE_RESOURCE_DIR: &str = "locale";

/// File extension of packaged catalog files.
pub const LOCALE_RESOURCE_EXT: &str = "ini";

/// One packaged resource as enumerated by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedResource {
    /// Full path of the resource file inside the package.
    pub path: Utf8PathBuf,
    /// File extension, without the dot.
    pub extension: String,
}

/// Everything the host provides to the plugin at load time.
#[derive(Debug, Clone)]
pub struct HostEnv {
    /// Directory dedicated to this plugin's persisted data.
    pub data_dir: Utf8PathBuf,
    /// Display name of the plugin, used in the license notice.
    pub plugin_name: String,
    /// The host's own configured language identifier.
    pub host_language: String,
    /// Enumeration of the plugin's packaged resources.
    pub resources: Vec<PackagedResource>,
    /// Raw bytes of the bundled default config document.
    pub bundled_config: Vec<u8>,
}

/// State produced by [`load`] and consumed by [`enable`].
#[derive(Debug)]
pub struct PluginState {
    store: ConfigStore,
    locale: LocaleSelection,
    plugin_name: String,
    bundled_config: Vec<u8>,
}

impl PluginState {
    /// The loaded configuration store.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// The locale selection resolved at load time.
    pub fn locale(&self) -> &LocaleSelection {
        &self.locale
    }
}

/// First lifecycle phase: bring up the persisted config and pick a locale.
///
/// # Errors
///
/// Fails with [`ConfigValidationError`] when the user file violates the
/// field rules, or [`crate::store::ConfigInitError`] when the store cannot
/// be created or read. Both are fatal; the host must not enable the plugin.
pub fn load(env: &HostEnv) -> Result<PluginState> {
    let locale_dir = discover_locale_dir(env)?;

    let mut store = ConfigStore::new(&env.data_dir, env.bundled_config.clone())
        .context("config store setup failed")?;
    store.ensure_defaults_written()?;
    store.load()?;

    let failures = validation::validate(store.get_all());
    if !failures.is_empty() {
        let err = ConfigValidationError { failures };
        tracing::error!("{err}");
        return Err(err.into());
    }

    store.set_all(validation::coerce(store.get_all().clone()));

    let locale = LocaleSelection::new(requested_language(&store, &env.host_language), locale_dir);

    Ok(PluginState {
        store,
        locale,
        plugin_name: env.plugin_name.clone(),
        bundled_config: env.bundled_config.clone(),
    })
}

/// Second lifecycle phase: version upgrade, comment localization, license
/// notice. Requires the catalog the host built from the load-phase
/// [`LocaleSelection`].
pub fn enable(state: &mut PluginState, catalog: &dyn MessageCatalog) -> Result<()> {
    tracing::info!(
        "{}",
        catalog.resolve(keys::LANGUAGE_SELECTED, &[state.locale.requested.clone()])
    );

    let schema = upgrade::parse_schema(&state.bundled_config, catalog)?;
    upgrade::apply_upgrade(&mut state.store, &schema, catalog)?;

    let (resolved, changed) = resolve_comments(state.store.get_all(), catalog);
    if changed {
        state.store.set_all(resolved);
        state.store.save()?;
    }

    tracing::info!(
        "{}",
        catalog.resolve(keys::PLUGIN_LICENSE, &[state.plugin_name.clone()])
    );

    Ok(())
}

/// Create `<data>/locale/` and find the packaged locale catalog directory:
/// the parent of the first packaged `.ini` resource under a `locale` path.
fn discover_locale_dir(env: &HostEnv) -> Result<Option<Utf8PathBuf>> {
    let locale_data_dir = env.data_dir.join(LOCALE_RESOURCE_DIR);
    if !locale_data_dir.exists() {
        fs::create_dir_all(&locale_data_dir)
            .with_context(|| format!("failed to create locale directory: {locale_data_dir}"))?;
    }

    let dir = env.resources.iter().find_map(|resource| {
        if resource.extension != LOCALE_RESOURCE_EXT {
            return None;
        }
        if !resource
            .path
            .components()
            .any(|c| c.as_str() == LOCALE_RESOURCE_DIR)
        {
            return None;
        }
        resource.path.parent().map(Utf8Path::to_path_buf)
    });

    if dir.is_none() {
        tracing::warn!("No packaged locale resources found");
    }
    Ok(dir)
}

/// The language the user asked for, with the `"default"` sentinel replaced
/// by the host's configured language.
fn requested_language(store: &ConfigStore, host_language: &str) -> String {
    let lang = store
        .get(FIELD_LANG)
        .and_then(ConfigValue::as_str)
        .unwrap_or(lang::FALLBACK_LOCALE);

    if lang == lang::DEFAULT_LANG_SENTINEL {
        host_language.to_string()
    } else {
        lang.to_string()
    }
}
