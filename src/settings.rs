//! Layered runtime configuration.
//!
//! Settings come from an optional TOML file with `UNITWATCH_`-prefixed
//! environment overrides, e.g.:
//!
//! ```toml
//! system_name = "Substation-East"
//!
//! [sim]
//! units = 12
//! seed = 7
//!
//! [demo]
//! lookback_hours = 6
//! clear_probability = 0.4
//! ```

use std::path::Path;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::SeedConfig;

/// Top-level runtime settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// System name used in export filenames.
    pub system_name: String,
    pub sim: SimSettings,
    pub demo: DemoSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            system_name: "Unitwatch".to_string(),
            sim: SimSettings::default(),
            demo: DemoSettings::default(),
        }
    }
}

/// Simulator knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Number of simulated units.
    pub units: usize,
    /// RNG seed for the simulator walk.
    pub seed: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self { units: 8, seed: 42 }
    }
}

/// Demo alarm seeding knobs; mirrors [`SeedConfig`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub lookback_hours: i64,
    pub clear_probability: f64,
    pub clear_window_hours: i64,
    pub extra_cleared_min: usize,
    pub extra_cleared_max: usize,
    pub history_days: i64,
    /// RNG seed for fixture generation.
    pub seed: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        let cfg = SeedConfig::default();
        Self {
            lookback_hours: cfg.lookback_hours,
            clear_probability: cfg.clear_probability,
            clear_window_hours: cfg.clear_window_hours,
            extra_cleared_min: cfg.extra_cleared_min,
            extra_cleared_max: cfg.extra_cleared_max,
            history_days: cfg.history_days,
            seed: 1,
        }
    }
}

impl Settings {
    /// Load settings, layering the optional file under environment
    /// overrides (`UNITWATCH_SYSTEM_NAME`, `UNITWATCH_SIM__UNITS`, ...).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("UNITWATCH").separator("__").try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Fixture-generation config derived from the demo settings.
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            lookback_hours: self.demo.lookback_hours,
            clear_probability: self.demo.clear_probability,
            clear_window_hours: self.demo.clear_window_hours,
            extra_cleared_min: self.demo.extra_cleared_min,
            extra_cleared_max: self.demo.extra_cleared_max,
            history_days: self.demo.history_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.system_name, "Unitwatch");
        assert_eq!(settings.sim.units, 8);
        assert_eq!(settings.demo.clear_probability, 0.4);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "system_name = \"Substation-East\"\n\n[sim]\nunits = 3\n\n[demo]\nhistory_days = 14"
        )
        .unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.system_name, "Substation-East");
        assert_eq!(settings.sim.units, 3);
        assert_eq!(settings.demo.history_days, 14);
        // Untouched values keep their defaults
        assert_eq!(settings.sim.seed, 42);
    }

    #[test]
    fn test_seed_config_mirrors_demo_settings() {
        let mut settings = Settings::default();
        settings.demo.lookback_hours = 12;
        let cfg = settings.seed_config();
        assert_eq!(cfg.lookback_hours, 12);
        assert_eq!(cfg.clear_probability, 0.4);
    }
}
