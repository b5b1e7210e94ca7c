//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Defaults when no files exist
//! - User config loading, saving and environment overrides
//! - Preset file loading, validation and fallback to built-ins
//! - Loaded presets driving SelectionManager

use camino::Utf8PathBuf;
use gearscan::models::{NumericField, UnknownPresetPolicy};
use gearscan::{ConfigManager, PresetTable, SelectionManager, UserConfig};
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

// Each test gets its own prefix so parallel tests never see each other's
// environment.
fn manager(config_path: &Utf8PathBuf, prefix: &str) -> ConfigManager {
    ConfigManager::new(config_path)
        .unwrap()
        .with_env_prefix(prefix)
}

#[test]
fn test_create_config_manager_creates_dir() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("GearScan Data");

    let manager = ConfigManager::new(&nested).unwrap();

    assert!(nested.exists());
    assert_eq!(manager.config_dir(), &nested);
}

#[test]
fn test_load_default_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = manager(&config_path, "GEARSCAN_IT_DEFAULTS");

    let config = manager.load_user_config().unwrap();

    assert_eq!(config.service_url, "http://127.0.0.1:5000");
    assert_eq!(config.request_timeout_secs, 900);
    assert!(config.console_logging);
    assert_eq!(config.unknown_preset, UnknownPresetPolicy::Ignore);
}

#[test]
fn test_partial_user_config_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("GearScan Config.yaml"),
        "service_url: http://scanner.local:8080\nunknown_preset: reject\n",
    )
    .unwrap();

    let config = manager(&config_path, "GEARSCAN_IT_PARTIAL")
        .load_user_config()
        .unwrap();

    assert_eq!(config.service_url, "http://scanner.local:8080");
    assert_eq!(config.unknown_preset, UnknownPresetPolicy::Reject);
    assert_eq!(config.request_timeout_secs, 900);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = manager(&config_path, "GEARSCAN_IT_ENV");
    manager
        .save_user_config(&UserConfig {
            request_timeout_secs: 30,
            ..UserConfig::default()
        })
        .unwrap();

    // SAFETY: the variable name is unique to this test.
    unsafe {
        std::env::set_var("GEARSCAN_IT_ENV_REQUEST_TIMEOUT_SECS", "120");
    }
    let config = manager.load_user_config().unwrap();
    unsafe {
        std::env::remove_var("GEARSCAN_IT_ENV_REQUEST_TIMEOUT_SECS");
    }

    assert_eq!(config.request_timeout_secs, 120);
}

#[test]
fn test_invalid_user_config_is_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("GearScan Config.yaml"),
        "request_timeout_secs: soon\n",
    )
    .unwrap();

    assert!(
        manager(&config_path, "GEARSCAN_IT_INVALID")
            .load_user_config()
            .is_err()
    );
}

#[test]
fn test_presets_file_loaded_in_order() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("GearScan Presets.yaml"),
        r#"
crit-rings:
  crit: true
  max-vers: true
  min_ilvl: 600
  slots: [Finger]
cheap:
  max_buyout: 500
"#,
    )
    .unwrap();

    let table = manager(&config_path, "GEARSCAN_IT_PRESETS")
        .load_presets()
        .unwrap();
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["crit-rings", "cheap"]);

    let selection = SelectionManager::new();
    selection
        .apply_preset(&table, "crit-rings", UnknownPresetPolicy::Reject)
        .unwrap();

    let request = selection.compile();
    assert_eq!(request.filter_tokens, vec!["Crit", "Max-Vers"]);
    assert_eq!(request.accessory_slots, vec!["Finger"]);
    assert_eq!(
        selection.read(|s| s.numeric_input(NumericField::MaxIlvl).to_string()),
        ""
    );
}

#[test]
fn test_invalid_preset_rejected() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("GearScan Presets.yaml"),
        "greedy:\n  haste: true\n  crit: true\n  vers: true\n",
    )
    .unwrap();

    let err = manager(&config_path, "GEARSCAN_IT_BAD_PRESET")
        .load_presets()
        .unwrap_err();
    assert!(format!("{:#}", err).contains("greedy"));
}

#[test]
fn test_missing_presets_fall_back_to_builtin() {
    let (_temp_dir, config_path) = create_test_config_dir();

    let table = manager(&config_path, "GEARSCAN_IT_BUILTIN")
        .load_presets()
        .unwrap();

    assert_eq!(table, PresetTable::builtin());
}
