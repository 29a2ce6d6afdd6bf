//! Configuration Management

use crate::analysis::confidence::ScoringConfig;
use crate::chunking::burst_detector::BurstConfig;
use crate::semantic::alignment::AlignmentConfig;
use crate::synthesis::synthesizer::SynthesisConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Burst detection settings
    #[serde(default)]
    pub bursts: BurstConfig,
    /// Observation alignment settings
    #[serde(default)]
    pub alignment: AlignmentConfig,
    /// Confidence scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Quality report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Quality report and output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Steps below this confidence are reported as errors
    pub min_confidence: f64,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            pretty: true,
        }
    }
}

impl Config {
    /// Pipeline configuration handed to the synthesizer
    pub fn synthesis(&self) -> SynthesisConfig {
        SynthesisConfig {
            bursts: self.bursts.clone(),
            alignment: self.alignment.clone(),
            scoring: self.scoring.clone(),
        }
    }

    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.synthesis().validate()?;
        if !(0.0..=1.0).contains(&self.report.min_confidence) {
            return Err(crate::Error::Config(format!(
                "min_confidence must be in [0, 1], got {}",
                self.report.min_confidence
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, crate::Error> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".step_synth").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Look up a value by dotted key (e.g. "scoring.visual_weight")
    pub fn get(&self, key: &str) -> Result<Option<String>, crate::Error> {
        let root = toml::Value::try_from(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        let found = key
            .split('.')
            .try_fold(&root, |value, part| value.get(part));
        Ok(found.map(|v| v.to_string()))
    }

    /// Return a copy with one dotted key replaced.
    ///
    /// The value is parsed as a TOML value (number, bool, array); anything
    /// that does not parse is taken as a string. The result is validated.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, crate::Error> {
        let mut root =
            toml::Value::try_from(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        let parsed = parse_toml_value(value);
        let mut parts: Vec<&str> = key.split('.').collect();
        let leaf = parts
            .pop()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| crate::Error::Config(format!("invalid key '{}'", key)))?;

        let mut table = &mut root;
        for part in parts {
            table = table
                .get_mut(part)
                .ok_or_else(|| crate::Error::Config(format!("unknown section '{}'", part)))?;
        }
        let slot = table
            .get_mut(leaf)
            .ok_or_else(|| crate::Error::Config(format!("unknown key '{}'", key)))?;
        *slot = parsed;

        let updated: Self = root
            .try_into()
            .map_err(|e: toml::de::Error| crate::Error::Config(e.to_string()))?;
        updated.validate()?;
        Ok(updated)
    }
}

fn parse_toml_value(raw: &str) -> toml::Value {
    format!("value = {}", raw)
        .parse::<toml::Table>()
        .ok()
        .and_then(|mut t| t.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}
