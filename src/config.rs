use anyhow::Result;
use compute::catalog::{CatalogSource, FileSource, FixtureSource};
use compute::session::Dashboard;
use compute::simulation::SimulationDelays;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Log filter used when RUST_LOG is not set.
pub const DEFAULT_LOG_FILTER: &str = "procast=info,compute=info";

pub const FORECAST_DELAY_VAR: &str = "PROCAST_FORECAST_DELAY_MS";
pub const UPLOAD_DELAY_VAR: &str = "PROCAST_UPLOAD_DELAY_MS";
pub const REPLY_DELAY_VAR: &str = "PROCAST_REPLY_DELAY_MS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got '{value}'")]
    InvalidDelay { name: String, value: String },
}

/// Runtime settings that are not command line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub delays: SimulationDelays,
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self> {
        let settings = Self::from_lookup(|name| std::env::var(name).ok())?;
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Builds the settings from any variable lookup, falling back to the
    /// defaults for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SimulationDelays::default();
        Ok(Self {
            delays: SimulationDelays {
                forecast: delay(&lookup, FORECAST_DELAY_VAR, defaults.forecast)?,
                upload: delay(&lookup, UPLOAD_DELAY_VAR, defaults.upload)?,
                reply: delay(&lookup, REPLY_DELAY_VAR, defaults.reply)?,
            },
        })
    }
}

fn delay<F>(lookup: &F, name: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDelay {
                name: name.to_string(),
                value,
            }),
    }
}

/// The catalog source for an optional `--catalog` path.
pub fn catalog_source(path: Option<&Path>) -> Box<dyn CatalogSource> {
    match path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(FixtureSource),
    }
}

/// Loads the catalog and builds a dashboard session.
pub async fn initialize_dashboard(
    catalog: Option<&Path>,
    settings: &Settings,
) -> Result<Dashboard> {
    let source = catalog_source(catalog);
    info!("Using catalog source: {}", source.describe());

    match compute::default_dashboard(source.as_ref(), settings.delays).await {
        Ok(dashboard) => {
            debug!("Dashboard session initialized");
            Ok(dashboard)
        }
        Err(e) => {
            error!("Failed to load catalog '{}': {}", source.describe(), e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.delays, SimulationDelays::default());
    }

    #[test]
    fn test_delay_overrides() {
        let settings =
            Settings::from_lookup(lookup(&[(FORECAST_DELAY_VAR, "0"), (REPLY_DELAY_VAR, " 250 ")]))
                .unwrap();
        assert_eq!(settings.delays.forecast, Duration::ZERO);
        assert_eq!(settings.delays.upload, Duration::from_millis(2000));
        assert_eq!(settings.delays.reply, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_delay() {
        let err = Settings::from_lookup(lookup(&[(UPLOAD_DELAY_VAR, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDelay {
                name: UPLOAD_DELAY_VAR.to_string(),
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_catalog_source_selection() {
        assert_eq!(catalog_source(None).describe(), "fixtures");
        assert_eq!(
            catalog_source(Some(Path::new("groups.yaml"))).describe(),
            "groups.yaml"
        );
    }
}
