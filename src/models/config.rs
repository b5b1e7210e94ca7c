use super::preset::UnknownPresetPolicy;
use serde::{Deserialize, Serialize};

/// User configuration from `GearScan Config.yaml`
///
/// Every key can be overridden from the environment with a `GEARSCAN_` prefix,
/// e.g. `GEARSCAN_SERVICE_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Base URL of the scan service (`/scan` and `/reload` are appended)
    pub service_url: String,

    /// HTTP timeout for a single call to the scan service
    pub request_timeout_secs: u64,

    pub debug_mode: bool,

    /// Mirror file logs to the console
    pub console_logging: bool,

    /// Behavior when a preset name is not in the table
    pub unknown_preset: UnknownPresetPolicy,

    /// Preset applied at startup when none is given on the command line
    pub default_preset: Option<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            request_timeout_secs: default_request_timeout(),
            debug_mode: false,
            console_logging: true,
            unknown_preset: UnknownPresetPolicy::Ignore,
            default_preset: None,
        }
    }
}

fn default_service_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

// Full-realm scans run server-side before the response returns.
fn default_request_timeout() -> u64 {
    900
}
