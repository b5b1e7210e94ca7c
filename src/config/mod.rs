use crate::models::{PresetRecord, PresetTable, UserConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use indexmap::IndexMap;
use std::fs;

/// Prefix for environment overrides of [`UserConfig`] keys.
pub const ENV_PREFIX: &str = "GEARSCAN";

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages two configuration files:
/// - User config (`GearScan Config.yaml`): service URL, timeouts, logging, preset policy
/// - Presets (`GearScan Presets.yaml`): named filter templates
///
/// Both files are optional; missing files fall back to built-in defaults.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    user_config_path: Utf8PathBuf,
    presets_path: Utf8PathBuf,
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing configuration files (e.g., "GearScan Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            user_config_path: config_dir.join("GearScan Config.yaml"),
            presets_path: config_dir.join("GearScan Presets.yaml"),
            config_dir,
            env_prefix: ENV_PREFIX.to_string(),
        })
    }

    /// Use a different environment prefix for overrides.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load the user configuration.
    ///
    /// Layers, lowest first: built-in defaults, `GearScan Config.yaml`,
    /// then `<PREFIX>_<KEY>` environment variables.
    pub fn load_user_config(&self) -> Result<UserConfig> {
        if !self.user_config_path.exists() {
            tracing::warn!(
                "User config file not found at {}, using defaults",
                self.user_config_path
            );
        }

        let settings = Config::builder()
            .add_source(File::new(self.user_config_path.as_str(), FileFormat::Yaml).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read user config: {}", self.user_config_path))?;

        let config: UserConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse user config: {}", self.user_config_path))?;

        tracing::info!("Loaded user config from {}", self.user_config_path);
        Ok(config)
    }

    /// Save the user configuration file.
    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize user config to YAML")?;

        fs::write(&self.user_config_path, yaml_string)
            .with_context(|| format!("Failed to write user config: {}", self.user_config_path))?;

        tracing::info!("Saved user config to {}", self.user_config_path);
        Ok(())
    }

    /// Load the preset table.
    ///
    /// # Returns
    /// The presets from `GearScan Presets.yaml`, or the built-in table if the
    /// file doesn't exist. A file with an invalid preset is an error.
    pub fn load_presets(&self) -> Result<PresetTable> {
        if !self.presets_path.exists() {
            tracing::warn!(
                "Presets file not found at {}, using built-in presets",
                self.presets_path
            );
            return Ok(PresetTable::builtin());
        }

        let file_contents = fs::read_to_string(&self.presets_path)
            .with_context(|| format!("Failed to read presets: {}", self.presets_path))?;

        let records: IndexMap<String, PresetRecord> = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse presets: {}", self.presets_path))?;

        let table = PresetTable::new(records)
            .with_context(|| format!("Invalid presets file: {}", self.presets_path))?;

        tracing::info!("Loaded {} presets from {}", table.len(), self.presets_path);
        Ok(table)
    }

    /// Save the preset table.
    pub fn save_presets(&self, presets: &PresetTable) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(presets.records())
            .context("Failed to serialize presets to YAML")?;

        fs::write(&self.presets_path, yaml_string)
            .with_context(|| format!("Failed to write presets: {}", self.presets_path))?;

        tracing::info!("Saved {} presets to {}", presets.len(), self.presets_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
