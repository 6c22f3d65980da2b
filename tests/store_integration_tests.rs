//! Integration tests for the configuration store and the upgrade merge
//!
//! These tests verify:
//! - First-run seeding of the default config file
//! - Persistence round trips through load/save/reload
//! - Defaults-forward merge preserving user customization
//! - The full version-upgrade sequence against the persisted file

use camino::Utf8PathBuf;
use plugconf::models::{FIELD_CONFIG_VERSION, FIELD_LANG};
use plugconf::upgrade::{self, UpgradeDecision};
use plugconf::{ConfigStore, ConfigValue, StaticCatalog};
use std::fs;
use tempfile::TempDir;

const BUNDLED: &str = "config-version: 5\nlang: default\nx: 10\ny: 20\n";

fn create_test_store(bundled: &str) -> (ConfigStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let store = ConfigStore::new(&data_dir, bundled.as_bytes()).unwrap();
    (store, temp_dir)
}

#[test]
fn test_first_run_seeds_file_with_bundled_schema() {
    let (mut store, _temp_dir) = create_test_store(BUNDLED);

    store.ensure_defaults_written().unwrap();
    let on_disk = fs::read_to_string(store.path()).unwrap();
    assert_eq!(on_disk, BUNDLED);

    store.load().unwrap();
    assert_eq!(store.get(FIELD_CONFIG_VERSION), Some(&ConfigValue::Int(5)));
    assert_eq!(store.get(FIELD_LANG), Some(&ConfigValue::from("default")));
    assert_eq!(store.get("x"), Some(&ConfigValue::Int(10)));
}

#[test]
fn test_subsequent_load_returns_same_content() {
    let (mut store, _temp_dir) = create_test_store(BUNDLED);
    store.ensure_defaults_written().unwrap();
    store.load().unwrap();
    let first = store.get_all().clone();

    let mut second_store =
        ConfigStore::new(store.path().parent().unwrap(), BUNDLED.as_bytes()).unwrap();
    second_store.ensure_defaults_written().unwrap();
    second_store.load().unwrap();

    assert_eq!(second_store.get_all(), &first);
}

#[test]
fn test_upgrade_sequence_preserves_user_values() {
    // Stored file at version 3 with a user-customized x; bundled schema at
    // version 5 with defaults {x: 10, y: 20}.
    let (mut store, _temp_dir) = create_test_store(BUNDLED);
    fs::write(store.path(), "config-version: 3\nlang: en\nx: 99\n").unwrap();
    store.load().unwrap();

    let catalog = StaticCatalog::new("en");
    let schema = upgrade::parse_schema(BUNDLED.as_bytes(), &catalog).unwrap();
    upgrade::apply_upgrade(&mut store, &schema, &catalog).unwrap();

    // In-memory document was reloaded from the merged file.
    assert_eq!(store.get(FIELD_CONFIG_VERSION), Some(&ConfigValue::Int(5)));
    assert_eq!(store.get(FIELD_LANG), Some(&ConfigValue::from("en")));
    assert_eq!(store.get("x"), Some(&ConfigValue::Int(99)));
    assert_eq!(store.get("y"), Some(&ConfigValue::Int(20)));

    // And the persisted file agrees.
    let on_disk: plugconf::ConfigDocument =
        serde_yaml_ng::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(&on_disk, store.get_all());
}

#[test]
fn test_decide_matches_persisted_versions() {
    assert_eq!(upgrade::decide(3, 5), UpgradeDecision::NeedsUpdate(5));
    assert_eq!(upgrade::decide(9, 5), UpgradeDecision::UnknownFuture(9));
    assert_eq!(upgrade::decide(5, 5), UpgradeDecision::UpToDate);
}

#[test]
fn test_future_version_file_is_not_rewritten() {
    let (mut store, _temp_dir) = create_test_store(BUNDLED);
    let future = "config-version: 9\nlang: en\ncustom: 1\n";
    fs::write(store.path(), future).unwrap();
    store.load().unwrap();

    let catalog = StaticCatalog::new("en");
    let schema = upgrade::parse_schema(BUNDLED.as_bytes(), &catalog).unwrap();
    upgrade::apply_upgrade(&mut store, &schema, &catalog).unwrap();

    assert_eq!(fs::read_to_string(store.path()).unwrap(), future);
}

#[test]
fn test_key_order_survives_merge_and_save() {
    let (mut store, _temp_dir) = create_test_store(BUNDLED);
    fs::write(store.path(), "config-version: 3\nlang: en\nx: 99\n").unwrap();
    store.load().unwrap();

    let catalog = StaticCatalog::new("en");
    let schema = upgrade::parse_schema(BUNDLED.as_bytes(), &catalog).unwrap();
    upgrade::apply_upgrade(&mut store, &schema, &catalog).unwrap();

    // User's existing keys keep their order; merged keys append.
    let keys: Vec<&str> = store.get_all().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["config-version", "lang", "x", "y"]);
}
