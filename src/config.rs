// src/config.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::drivers::schedule::tick_interval;
use crate::drivers::{ScopeError, UnitConverter, ViewportBounds};
use crate::types::ConnectionMode;

/// Startup settings. Read once, never changed while running.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    /// Visible window width in seconds.
    pub time_scale: f64,
    /// Window capacity in samples.
    pub frames_amount: usize,
    /// ADC full-scale count.
    pub resolution: f64,
    pub ref_voltage: f64,
    pub max_ticks: Option<u64>,
    pub mode: ConnectionMode,
    /// Fraction of simulated lines sent corrupted.
    pub glitch_rate: f64,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_owned(),
            baud_rate: 9600,
            read_timeout_ms: 1000,
            time_scale: 2.0,
            frames_amount: 200,
            resolution: 65535.0,
            ref_voltage: 3.3,
            max_ticks: None,
            mode: ConnectionMode::Hardware,
            glitch_rate: 0.0,
        }
    }
}

impl ScopeConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ScopeError> {
        serde_json::from_str(text).map_err(|e| ScopeError::Config(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ScopeError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScopeError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Everything that would otherwise fail mid-run is rejected here.
    pub fn validate(&self) -> Result<(), ScopeError> {
        self.converter()?;
        tick_interval(self.time_scale, self.frames_amount)?;
        if !self.ref_voltage.is_finite() {
            return Err(ScopeError::Config(format!(
                "reference voltage must be finite, got {}",
                self.ref_voltage
            )));
        }
        if self.mode == ConnectionMode::Hardware && self.port.trim().is_empty() {
            return Err(ScopeError::Config("serial port name is empty".into()));
        }
        if self.read_timeout_ms == 0 {
            return Err(ScopeError::Config("read timeout must be at least 1 ms".into()));
        }
        if !(0.0..=1.0).contains(&self.glitch_rate) {
            return Err(ScopeError::Config(format!(
                "glitch rate must be within [0, 1], got {}",
                self.glitch_rate
            )));
        }
        Ok(())
    }

    pub fn converter(&self) -> Result<UnitConverter, ScopeError> {
        Ok(UnitConverter::new(self.ref_voltage, self.resolution)?)
    }

    pub fn tick_interval(&self) -> Result<Duration, ScopeError> {
        tick_interval(self.time_scale, self.frames_amount)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn default_viewport(&self) -> ViewportBounds {
        ViewportBounds::for_device(self.ref_voltage, self.time_scale)
    }
}

#[derive(Debug, Parser)]
#[command(name = "voltscope", version, about = "Live two-channel voltage plot from a serial ADC stream")]
pub struct Cli {
    /// JSON settings file; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub port: Option<String>,
    #[arg(long)]
    pub baud: Option<u32>,
    /// Visible window width in seconds.
    #[arg(long)]
    pub time_scale: Option<f64>,
    /// Samples kept in the window.
    #[arg(long)]
    pub frames: Option<usize>,
    #[arg(long)]
    pub resolution: Option<f64>,
    #[arg(long)]
    pub ref_voltage: Option<f64>,
    /// Stop after this many ticks.
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Generate frames locally instead of opening the port.
    #[arg(long)]
    pub simulate: bool,
    /// Fraction of simulated lines sent corrupted.
    #[arg(long, requires = "simulate")]
    pub glitch_rate: Option<f64>,
    /// Run without a window.
    #[arg(long)]
    pub headless: bool,
    /// Write the final window to this PNG (headless only).
    #[arg(long, requires = "headless")]
    pub snapshot: Option<PathBuf>,
}

impl Cli {
    pub fn resolve(&self) -> Result<ScopeConfig, ScopeError> {
        let mut config = match &self.config {
            Some(path) => ScopeConfig::from_json_file(path)?,
            None => ScopeConfig::default(),
        };
        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(time_scale) = self.time_scale {
            config.time_scale = time_scale;
        }
        if let Some(frames) = self.frames {
            config.frames_amount = frames;
        }
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(ref_voltage) = self.ref_voltage {
            config.ref_voltage = ref_voltage;
        }
        if self.ticks.is_some() {
            config.max_ticks = self.ticks;
        }
        if self.simulate {
            config.mode = ConnectionMode::Simulation;
        }
        if let Some(rate) = self.glitch_rate {
            config.glitch_rate = rate;
        }
        config.validate()?;
        Ok(config)
    }
}
