use crate::config::AppConfig;
use crate::core::{
    AppLoop, Canvas, DrawTarget, EventSource, ExitStatus, FrameRenderer, LoopEvent, PixelFormat,
    PresentError, Presenter, RasterProvider, SurfaceError, SurfaceProvider,
};

const DEFAULT_HEADLESS_FRAMES: u64 = 60;

/// Renders into a CPU canvas with no window; presenting only counts frames
pub struct HeadlessPresenter {
    provider: RasterProvider,
    canvas: Canvas,
    presented: u64,
}

impl HeadlessPresenter {
    pub fn new(provider: RasterProvider, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let canvas = provider.create_surface(width, height)?;
        Ok(Self {
            provider,
            canvas,
            presented: 0,
        })
    }

    /// The most recently drawn frame
    pub fn frame(&self) -> &Canvas {
        &self.canvas
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Presenter for HeadlessPresenter {
    fn canvas(&mut self) -> &mut dyn DrawTarget {
        &mut self.canvas
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.canvas = self.provider.create_surface(width, height)?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.presented += 1;
        log::trace!("headless frame {}", self.presented);
        Ok(())
    }
}

/// Event source that never produces input
#[derive(Debug, Default)]
pub struct NoEvents;

impl EventSource for NoEvents {
    fn poll_events(&mut self) -> Vec<LoopEvent> {
        Vec::new()
    }
}

/// Run the loop without a window until the frame budget is spent
pub fn run(config: &AppConfig) -> ExitStatus {
    let mut options = config.loop_options();
    let frames = *options.max_frames.get_or_insert(DEFAULT_HEADLESS_FRAMES);
    log::info!("headless run: {} frames of {:?}", frames, config.scene);

    let provider = RasterProvider::new(PixelFormat::Rgba8Premul).with_row_order(config.row_order);
    let presenter =
        HeadlessPresenter::new(provider, config.width, config.height).map_err(anyhow::Error::from);

    let mut app = AppLoop::new(FrameRenderer::new(config.scene), options);
    app.start(presenter);
    app.run(&mut NoEvents)
}
