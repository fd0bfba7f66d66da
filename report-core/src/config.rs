use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the weather chart pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// Open-Meteo forecast endpoint.
    pub endpoint: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// PNG written by the line chart.
    pub output: PathBuf,
    pub timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
            city: "Mumbai".to_string(),
            latitude: 19.076,
            longitude: 72.8777,
            output: PathBuf::from("weather_chart.png"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WeatherSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the COVID-19 report pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CovidSettings {
    /// disease.sh countries endpoint; the country is appended as a path segment.
    pub endpoint: String,
    /// Matched exactly and case-sensitively by the upstream service.
    pub country: String,
    pub chart_output: PathBuf,
    pub report_output: PathBuf,
    pub timeout_secs: u64,
}

impl Default for CovidSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://disease.sh/v3/covid-19/countries".to_string(),
            country: "India".to_string(),
            chart_output: PathBuf::from("covid_chart.png"),
            report_output: PathBuf::from("covid_report.pdf"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CovidSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [weather]
/// city = "Mumbai"
/// latitude = 19.076
/// longitude = 72.8777
///
/// [covid]
/// country = "India"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherSettings,
    pub covid: CovidSettings,
}

impl Config {
    /// Load config from the platform config directory, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use the built-in constants.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "report-task", "report-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("report-core-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn defaults_match_built_in_constants() {
        let cfg = Config::default();

        assert_eq!(cfg.weather.city, "Mumbai");
        assert_eq!(cfg.weather.latitude, 19.076);
        assert_eq!(cfg.weather.longitude, 72.8777);
        assert_eq!(cfg.weather.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.covid.country, "India");
        assert_eq!(cfg.covid.chart_output, PathBuf::from("covid_chart.png"));
        assert_eq!(cfg.covid.report_output, PathBuf::from("covid_report.pdf"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let cfg: Config = toml::from_str(
            r#"
            [covid]
            country = "Brazil"
            "#,
        )
        .expect("partial config must parse");

        assert_eq!(cfg.covid.country, "Brazil");
        assert_eq!(cfg.covid.endpoint, CovidSettings::default().endpoint);
        assert_eq!(cfg.weather, WeatherSettings::default());
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let cfg = Config::load_from(&scratch_path("does-not-exist.toml"))
            .expect("missing file is not an error");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = scratch_path("nested/config.toml");
        let mut cfg = Config::default();
        cfg.weather.city = "Pune".into();
        cfg.weather.latitude = 18.52;
        cfg.covid.timeout_secs = 3;

        cfg.save_to(&path).expect("save must succeed");
        let loaded = Config::load_from(&path).expect("load must succeed");

        assert_eq!(loaded, cfg);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let path = scratch_path("broken.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[weather\ncity = 1").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        let _ = fs::remove_file(&path);
    }
}
