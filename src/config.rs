use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::core::{LoopOptions, RowOrder, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Draw directly into the swapchain with wgpu
    Gpu,
    /// Rasterize on the CPU, upload through the texture bridge
    #[default]
    Raster,
    /// Rasterize on the CPU, copy into a native window buffer
    Software,
    /// Rasterize on the CPU with no window
    Headless,
}

/// Startup settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub backend: Backend,
    pub scene: Scene,
    pub row_order: RowOrder,
    pub redraw_interval_ms: Option<u64>,
    pub max_frames: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "paint-window".to_string(),
            width: 800,
            height: 600,
            backend: Backend::default(),
            scene: Scene::default(),
            row_order: RowOrder::default(),
            redraw_interval_ms: None,
            max_frames: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Config file (if any), then CLI overrides, then validation
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(title) = &cli.title {
            self.title = title.clone();
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(backend) = cli.backend {
            self.backend = backend;
        }
        if let Some(scene) = cli.scene {
            self.scene = scene;
        }
        if let Some(row_order) = cli.row_order {
            self.row_order = row_order;
        }
        if cli.redraw_interval_ms.is_some() {
            self.redraw_interval_ms = cli.redraw_interval_ms;
        }
        if cli.max_frames.is_some() {
            self.max_frames = cli.max_frames;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.max_frames == Some(0) {
            bail!("max_frames must be at least 1");
        }
        Ok(())
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            redraw_interval: self.redraw_interval_ms.map(|ms| ms as f32 / 1000.0),
            max_frames: self.max_frames,
        }
    }
}
