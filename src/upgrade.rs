//! Schema-version comparison and the defaults-forward upgrade merge.
//!
//! The bundled schema defines the latest known config version. At enable time
//! the stored version is compared against it once; an older file is merged
//! forward (bundled defaults inserted, user values preserved, version bumped)
//! and a newer file is left untouched with a warning. No migration scripts,
//! no file watching.

use crate::lang::{MessageCatalog, keys};
use crate::models::{ConfigDocument, ConfigValue, FIELD_CONFIG_VERSION};
use crate::store::{ConfigInitError, ConfigStore};
use std::cmp::Ordering;

/// Outcome of comparing the stored config version against the bundled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeDecision {
    /// The stored config is older; merge defaults forward to this version.
    NeedsUpdate(i64),
    /// The stored config claims a version newer than the bundled schema.
    /// Forward-compatibility accommodation, not an error.
    UnknownFuture(i64),
    /// Versions match.
    UpToDate,
}

/// Compare the stored version against the bundled schema's version.
pub fn decide(current: i64, latest: i64) -> UpgradeDecision {
    match current.cmp(&latest) {
        Ordering::Less => UpgradeDecision::NeedsUpdate(latest),
        Ordering::Greater => UpgradeDecision::UnknownFuture(current),
        Ordering::Equal => UpgradeDecision::UpToDate,
    }
}

/// Parse the bundled schema document from its packaged raw bytes.
///
/// The schema must carry a `config-version`; its absence means malformed
/// packaging and aborts initialization.
pub fn parse_schema(
    bundled: &[u8],
    catalog: &dyn MessageCatalog,
) -> Result<ConfigDocument, ConfigInitError> {
    let schema: ConfigDocument =
        serde_yaml_ng::from_slice(bundled).map_err(ConfigInitError::SchemaParse)?;

    if schema
        .get(FIELD_CONFIG_VERSION)
        .and_then(ConfigValue::as_int)
        .is_none()
    {
        tracing::error!("{}", catalog.resolve(keys::CONFIG_LOAD_ERROR, &[]));
        return Err(ConfigInitError::SchemaVersionMissing);
    }

    Ok(schema)
}

/// Run the version check and, when the stored config is behind, apply the
/// merge sequence: insert missing defaults, bump the version, save, reload.
///
/// The reload re-reads the merged file so the in-memory document reflects
/// persisted state rather than being trusted as-is.
pub fn apply_upgrade(
    store: &mut ConfigStore,
    schema: &ConfigDocument,
    catalog: &dyn MessageCatalog,
) -> Result<(), ConfigInitError> {
    let latest = schema
        .get(FIELD_CONFIG_VERSION)
        .and_then(ConfigValue::as_int)
        .ok_or(ConfigInitError::SchemaVersionMissing)?;

    // Presence and type are guaranteed by validation before enable runs.
    let current = store
        .get(FIELD_CONFIG_VERSION)
        .and_then(ConfigValue::as_int)
        .unwrap_or(0);

    match decide(current, latest) {
        UpgradeDecision::NeedsUpdate(target) => {
            tracing::warn!(
                "{}",
                catalog.resolve(keys::CONFIG_VERSION_UPDATE_AVAILABLE, &[])
            );
            store.set_defaults(schema);
            store.set(FIELD_CONFIG_VERSION, target);
            store.save()?;
            store.reload()?;
            tracing::info!(
                "{}",
                catalog.resolve(keys::CONFIG_VERSION_UPDATE_SUCCESS, &[])
            );
        }
        UpgradeDecision::UnknownFuture(_) => {
            tracing::warn!("{}", catalog.resolve(keys::CONFIG_VERSION_UNKNOWN, &[]));
        }
        UpgradeDecision::UpToDate => {
            tracing::info!("{}", catalog.resolve(keys::CONFIG_VERSION_LATEST, &[]));
        }
    }

    Ok(())
}
