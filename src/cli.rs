// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::Backend;
use crate::core::{RowOrder, Scene};

/// Every setting is optional here; unset flags fall back to the config file,
/// then to built-in defaults.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "paint-window")]
#[command(about = "Opens a window and repaints a fixed frame until closed", long_about = None)]
pub struct Cli {
    /// JSON config file; flags given here override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Display path
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Frame to draw
    #[arg(long, value_enum)]
    pub scene: Option<Scene>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub title: Option<String>,

    /// Row storage order of CPU canvases
    #[arg(long, value_enum)]
    pub row_order: Option<RowOrder>,

    /// Minimum milliseconds between frames (default: every iteration)
    #[arg(long, value_name = "MS")]
    pub redraw_interval_ms: Option<u64>,

    /// Close after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Log filter in env_logger syntax; overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_no_overrides() {
        let cli = Cli::try_parse_from(["paint-window"]).unwrap();
        assert!(cli.backend.is_none());
        assert!(cli.width.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn flags_parse_kebab_case_values() {
        let cli = Cli::try_parse_from([
            "paint-window",
            "--backend",
            "software",
            "--scene",
            "blue-rect",
            "--row-order",
            "bottom-up",
            "--width",
            "640",
            "--max-frames",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.backend, Some(Backend::Software));
        assert_eq!(cli.scene, Some(Scene::BlueRect));
        assert_eq!(cli.row_order, Some(RowOrder::BottomUp));
        assert_eq!(cli.width, Some(640));
        assert_eq!(cli.max_frames, Some(3));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["paint-window", "--backend", "vulkan"]).is_err());
    }
}
