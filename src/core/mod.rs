pub mod app_loop;
pub mod bridge;
pub mod canvas;
pub mod clock;
pub mod color;
pub mod frame_renderer;
pub mod surface;
pub mod surface_info;
pub mod timer;

pub use app_loop::{
    AppLoop, EventSource, ExitStatus, Key, LoopEvent, LoopOptions, LoopState, PresentError,
    Presenter,
};
pub use bridge::{copy_rows, pack_rows, CopyOutcome, RowLayout, SkipReason};
pub use canvas::{Canvas, DrawCommand, DrawTarget, Rect};
pub use clock::Clock;
pub use color::{Color, PixelFormat, RowOrder};
pub use frame_renderer::{FrameRenderer, Scene};
pub use surface::{
    ensure_format, RasterProvider, StorageLocation, Surface, SurfaceError, SurfaceProvider,
};
pub use surface_info::SurfaceInfo;
pub use timer::{FixedInterval, FrameStats};
