use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use anyhow::{bail, Context, Result};
use shared::protocol::DEFAULT_TAG_FILTER;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub aws: AwsConfig,
    pub probe: ProbeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Service catalog: grouping key -> list of `{name, tag, port}` records
    #[serde(default)]
    pub services: toml::Table,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    /// Named credentials profile; blank means none
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default = "default_tag_name")]
    pub tag_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Connect timeout in seconds. Required, there is no default.
    pub timeout: TimeoutSetting,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// Accepts both `timeout = 5` and the string-encoded `timeout = "5"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeoutSetting {
    Seconds(u64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub pretty: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_events")]
    pub events: bool,
}

fn default_tag_name() -> String {
    DEFAULT_TAG_FILTER.to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_events() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            verbose: false,
            events: default_events(),
        }
    }
}

impl AwsConfig {
    /// Profile name, treating a blank value as unset
    pub fn profile(&self) -> Option<&str> {
        self.profile
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Result<Duration> {
        let secs = match &self.timeout {
            TimeoutSetting::Seconds(secs) => *secs,
            TimeoutSetting::Text(text) => text
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid probe timeout: {:?}", text))?,
        };
        if secs == 0 {
            bail!("Probe timeout must be at least one second");
        }
        Ok(Duration::from_secs(secs))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.aws.region.trim().is_empty() {
            bail!("aws.region is mandatory");
        }
        if self.aws.tag_name.trim().is_empty() {
            bail!("aws.tag_name must not be empty");
        }
        if self.probe.concurrency == 0 {
            bail!("probe.concurrency must be at least 1");
        }
        self.probe.timeout()?;
        Ok(())
    }

    /// The `[services]` section as a loosely-typed value for the catalog parser
    pub fn catalog_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.services).context("Failed to convert service catalog")
    }
}
