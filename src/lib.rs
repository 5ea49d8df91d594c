pub mod cli;
pub mod config;
pub mod core;
pub mod gpu;
pub mod logging;
pub mod platform;

pub use config::{AppConfig, Backend};
pub use core::{
    AppLoop, Canvas, Color, DrawCommand, DrawTarget, ExitStatus, FrameRenderer, LoopEvent,
    LoopState, Presenter, Rect, Scene,
};
