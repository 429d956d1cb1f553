use serde::{Deserialize, Serialize};

/// Daily GBIF job trigger.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// TOML: `schedule.enabled`. Default: `true`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Six-field cron expression (sec min hour dom mon dow), evaluated in the
    /// host's local time zone.
    /// TOML: `schedule.cron`. Default: every day at 12:00.
    #[serde(default = "default_cron")]
    pub cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            cron: default_cron(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_cron() -> String {
    "0 0 12 * * *".to_string()
}
