use std::path::Path;
use std::time::Duration;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use crate::chart::{ChartStyle, HitTestMode, DEFAULT_CAPACITY, MAX_JITTER};
use crate::types::ConnectionMode;
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub mode: ConnectionMode,
    /// `host:port` for the line-framed TCP stream.
    pub address: String,
    /// `ws://` endpoint for the WebSocket stream.
    pub url: String,
    /// JSON field holding the sample when lines carry objects.
    pub field: Option<String>,
    pub connect_timeout_ms: u64,
    pub simulation_interval_ms: u64,
    pub simulation_jitter: f64,
}
impl StreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms)
    }
}
impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            mode: ConnectionMode::WebSocket,
            address: "127.0.0.1:3000".to_owned(),
            url: "ws://127.0.0.1:3000".to_owned(),
            field: None,
            connect_timeout_ms: 2000,
            simulation_interval_ms: 1000,
            simulation_jitter: 0.0,
        }
    }
}
/// How a chart derives its sample from an incoming stream value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTransform {
    #[default]
    Identity,
    /// `ceiling - value`
    Inverse { ceiling: f64 },
}
impl ValueTransform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            ValueTransform::Identity => value,
            ValueTransform::Inverse { ceiling } => ceiling - value,
        }
    }
}
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub id: Option<String>,
    /// Buffer capacity; negative values leave the chart permanently empty.
    #[serde(default)]
    pub buffer: Option<i64>,
    #[serde(default)]
    pub transform: ValueTransform,
}
impl ChartConfig {
    pub fn new(id: &str, transform: ValueTransform) -> Self {
        Self {
            id: Some(id.to_owned()),
            buffer: None,
            transform,
        }
    }
    pub fn capacity(&self) -> usize {
        match self.buffer {
            None => DEFAULT_CAPACITY,
            Some(n) => usize::try_from(n).unwrap_or(0),
        }
    }
}
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub stream: StreamConfig,
    pub charts: Vec<ChartConfig>,
    pub hit_test: HitTestMode,
    pub style: ChartStyle,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stream: StreamConfig::default(),
            charts: vec![
                ChartConfig::new("temperature-chart", ValueTransform::Identity),
                ChartConfig::new("inverse-chart", ValueTransform::Inverse { ceiling: 255.0 }),
            ],
            hit_test: HitTestMode::default(),
            style: ChartStyle::default(),
        }
    }
}
impl AppConfig {
    /// Reads a JSON config file, or returns the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        if config.stream.simulation_jitter.abs() > MAX_JITTER {
            bail!(
                "simulation_jitter {} is wider than {MAX_JITTER}",
                config.stream.simulation_jitter
            );
        }
        for chart in &config.charts {
            if chart.buffer.is_some_and(|n| n <= 0) {
                log::warn!("chart {:?} has no room for samples", chart.id);
            }
        }
        Ok(config)
    }
}
