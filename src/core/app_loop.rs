use std::fmt;

use super::canvas::DrawTarget;
use super::clock::Clock;
use super::frame_renderer::FrameRenderer;
use super::surface::SurfaceError;
use super::timer::{FixedInterval, FrameStats};

/// Keys the loop distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Other,
}

/// Input observed by one poll of the windowing toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    CloseRequested,
    KeyPressed(Key),
    Resized { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Closing,
    Terminated,
}

/// Process outcome of a loop run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Closed by the user or after the frame budget
    Success,
    /// Some part of initialization failed
    Failure,
}

impl ExitStatus {
    pub fn code(&self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// Failure to put a rendered frame on screen
#[derive(Debug)]
pub enum PresentError {
    /// This frame is lost; the next one may succeed
    Skipped(String),
    /// The display path is unusable
    Fatal(String),
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::Skipped(msg) => write!(f, "frame skipped: {}", msg),
            PresentError::Fatal(msg) => write!(f, "presentation failed: {}", msg),
        }
    }
}

impl std::error::Error for PresentError {}

impl From<SurfaceError> for PresentError {
    fn from(err: SurfaceError) -> Self {
        PresentError::Fatal(err.to_string())
    }
}

/// One display path: a surface to draw into, plus the bridge and swap that
/// put it on screen.
pub trait Presenter {
    /// Surface the next frame is drawn into
    fn canvas(&mut self) -> &mut dyn DrawTarget;

    /// Recreate the surface at a new size
    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError>;

    /// Bridge if needed, flush, and swap
    fn present(&mut self) -> Result<(), PresentError>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn canvas(&mut self) -> &mut dyn DrawTarget {
        (**self).canvas()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        (**self).resize(width, height)
    }

    fn present(&mut self) -> Result<(), PresentError> {
        (**self).present()
    }
}

/// Pull-style event polling; must not block
pub trait EventSource {
    fn poll_events(&mut self) -> Vec<LoopEvent>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopOptions {
    /// Minimum seconds between rendered frames
    pub redraw_interval: Option<f32>,
    /// Close normally after this many presented frames
    pub max_frames: Option<u64>,
}

/// Owns the presenter and renderer and drives them through the
/// `Uninitialized -> Running -> Closing -> Terminated` lifecycle.
pub struct AppLoop<P: Presenter> {
    state: LoopState,
    presenter: Option<P>,
    renderer: FrameRenderer,
    options: LoopOptions,
    throttle: Option<FixedInterval>,
    clock: Clock,
    stats: FrameStats,
    /// Seconds since the last presented frame
    since_present: f32,
    last_fps: Option<f32>,
    minimized: bool,
    exit: Option<ExitStatus>,
}

impl<P: Presenter> AppLoop<P> {
    pub fn new(renderer: FrameRenderer, options: LoopOptions) -> Self {
        Self {
            state: LoopState::Uninitialized,
            presenter: None,
            renderer,
            options,
            throttle: options.redraw_interval.map(FixedInterval::primed),
            clock: Clock::new(),
            stats: FrameStats::new(),
            since_present: 0.0,
            last_fps: None,
            minimized: false,
            exit: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Set once the loop has terminated
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit
    }

    /// Frames rendered and presented so far
    pub fn frames_rendered(&self) -> u64 {
        self.stats.total()
    }

    /// Most recent once-per-second frame rate
    pub fn fps(&self) -> Option<f32> {
        self.last_fps
    }

    /// True between a zero-size resize and the next non-zero one
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn presenter(&self) -> Option<&P> {
        self.presenter.as_ref()
    }

    /// Finish initialization with the result of building the display path
    pub fn start(&mut self, presenter: anyhow::Result<P>) -> LoopState {
        if self.state != LoopState::Uninitialized {
            log::warn!("start called in state {:?}; ignored", self.state);
            return self.state;
        }

        match presenter {
            Ok(presenter) => {
                self.presenter = Some(presenter);
                self.clock = Clock::new();
                self.state = LoopState::Running;
                log::info!("render loop running");
            }
            Err(err) => {
                log::error!("initialization failed: {err:#}");
                self.terminate(ExitStatus::Failure);
            }
        }
        self.state
    }

    /// One iteration with the wall-clock delta
    pub fn step<I>(&mut self, events: I) -> LoopState
    where
        I: IntoIterator<Item = LoopEvent>,
    {
        let delta = self.clock.tick();
        self.advance(events, delta)
    }

    /// One iteration: handle events, then render and present unless closing
    pub fn advance<I>(&mut self, events: I, delta: f32) -> LoopState
    where
        I: IntoIterator<Item = LoopEvent>,
    {
        if self.state != LoopState::Running {
            return self.state;
        }

        let mut close = false;
        let mut resize = None;
        for event in events {
            match event {
                LoopEvent::CloseRequested | LoopEvent::KeyPressed(Key::Escape) => close = true,
                LoopEvent::Resized { width, height } => resize = Some((width, height)),
                LoopEvent::KeyPressed(key) => log::trace!("key {:?} ignored", key),
            }
        }

        if close {
            self.shutdown(ExitStatus::Success);
            return self.state;
        }

        let Some(presenter) = self.presenter.as_mut() else {
            self.shutdown(ExitStatus::Failure);
            return self.state;
        };

        if let Some((width, height)) = resize {
            if width == 0 || height == 0 {
                if !self.minimized {
                    log::debug!("window minimized; holding surface");
                }
                self.minimized = true;
            } else {
                self.minimized = false;
                log::debug!("recreating surface at {}x{}", width, height);
                if let Err(err) = presenter.resize(width, height) {
                    log::error!("resize failed: {err}");
                    self.shutdown(ExitStatus::Failure);
                    return self.state;
                }
            }
        }

        self.since_present += delta;
        if self.minimized {
            return self.state;
        }

        if let Some(throttle) = self.throttle.as_mut() {
            if !throttle.tick(delta) {
                return self.state;
            }
        }

        self.renderer.render_frame(presenter.canvas());
        match presenter.present() {
            Ok(()) => {
                let elapsed = std::mem::take(&mut self.since_present);
                if let Some(fps) = self.stats.record(elapsed) {
                    log::debug!("{:.1} fps ({} frames)", fps, self.stats.total());
                    self.last_fps = Some(fps);
                }
            }
            Err(PresentError::Skipped(msg)) => log::warn!("frame skipped: {msg}"),
            Err(err @ PresentError::Fatal(_)) => {
                log::error!("{err}");
                self.shutdown(ExitStatus::Failure);
                return self.state;
            }
        }

        if let Some(max) = self.options.max_frames {
            if self.stats.total() >= max {
                log::info!("rendered {} frames; closing", max);
                self.shutdown(ExitStatus::Success);
            }
        }

        self.state
    }

    /// Poll and step until terminated
    pub fn run(&mut self, source: &mut dyn EventSource) -> ExitStatus {
        while self.state == LoopState::Running {
            let events = source.poll_events();
            self.step(events);
        }
        self.exit.unwrap_or(ExitStatus::Failure)
    }

    /// Release the display path and terminate. No-op once terminated.
    pub fn shutdown(&mut self, status: ExitStatus) {
        if self.state == LoopState::Terminated {
            return;
        }
        self.state = LoopState::Closing;
        if self.presenter.take().is_some() {
            log::debug!("display path released");
        }
        self.terminate(status);
    }

    fn terminate(&mut self, status: ExitStatus) {
        self.state = LoopState::Terminated;
        self.exit = Some(status);
        log::info!("render loop terminated ({:?})", status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::canvas::DrawCommand;
    use crate::core::frame_renderer::Scene;

    const NO_EVENTS: [LoopEvent; 0] = [];

    #[derive(Default)]
    struct CountingPresenter {
        draws: usize,
        presents: usize,
        resizes: Vec<(u32, u32)>,
    }

    impl DrawTarget for CountingPresenter {
        fn execute(&mut self, _command: &DrawCommand) {
            self.draws += 1;
        }
    }

    impl Presenter for CountingPresenter {
        fn canvas(&mut self) -> &mut dyn DrawTarget {
            self
        }

        fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
            self.resizes.push((width, height));
            Ok(())
        }

        fn present(&mut self) -> Result<(), PresentError> {
            self.presents += 1;
            Ok(())
        }
    }

    fn running(options: LoopOptions) -> AppLoop<CountingPresenter> {
        let mut app = AppLoop::new(FrameRenderer::new(Scene::BlueRect), options);
        app.start(Ok(CountingPresenter::default()));
        app
    }

    #[test]
    fn starts_uninitialized() {
        let app: AppLoop<CountingPresenter> =
            AppLoop::new(FrameRenderer::new(Scene::BlueRect), LoopOptions::default());
        assert_eq!(app.state(), LoopState::Uninitialized);
        assert_eq!(app.exit_status(), None);
    }

    #[test]
    fn iteration_renders_and_presents() {
        let mut app = running(LoopOptions::default());
        assert_eq!(app.advance(NO_EVENTS, 0.016), LoopState::Running);

        let presenter = app.presenter().unwrap();
        assert_eq!(presenter.draws, 2);
        assert_eq!(presenter.presents, 1);
        assert_eq!(app.frames_rendered(), 1);
    }

    #[test]
    fn escape_closes_with_success() {
        let mut app = running(LoopOptions::default());
        app.advance([LoopEvent::KeyPressed(Key::Escape)], 0.016);

        assert_eq!(app.state(), LoopState::Terminated);
        assert_eq!(app.exit_status(), Some(ExitStatus::Success));
        assert!(app.presenter().is_none());
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut app = running(LoopOptions::default());
        app.advance([LoopEvent::KeyPressed(Key::Space)], 0.016);
        assert_eq!(app.state(), LoopState::Running);
    }

    #[test]
    fn throttle_skips_frames_inside_interval() {
        let mut app = running(LoopOptions {
            redraw_interval: Some(0.5),
            max_frames: None,
        });

        app.advance(NO_EVENTS, 0.1);
        app.advance(NO_EVENTS, 0.1);
        app.advance(NO_EVENTS, 0.1);
        assert_eq!(app.frames_rendered(), 1);

        app.advance(NO_EVENTS, 0.5);
        assert_eq!(app.frames_rendered(), 2);
    }

    #[test]
    fn zero_size_resize_is_deferred() {
        let mut app = running(LoopOptions::default());
        app.advance([LoopEvent::Resized { width: 0, height: 0 }], 0.016);

        let presenter = app.presenter().unwrap();
        assert!(presenter.resizes.is_empty());
        assert_eq!(presenter.presents, 0);
    }

    #[test]
    fn minimized_window_stays_idle_until_restored() {
        let mut app = running(LoopOptions::default());
        app.advance([LoopEvent::Resized { width: 0, height: 0 }], 0.016);
        app.advance(NO_EVENTS, 0.016);
        app.advance(NO_EVENTS, 0.016);
        assert!(app.is_minimized());
        assert_eq!(app.frames_rendered(), 0);

        app.advance([LoopEvent::Resized { width: 640, height: 480 }], 0.016);
        assert!(!app.is_minimized());
        assert_eq!(app.frames_rendered(), 1);
        assert_eq!(app.presenter().unwrap().resizes, vec![(640, 480)]);
    }

    #[test]
    fn fps_counts_time_between_throttled_frames() {
        let mut app = running(LoopOptions {
            redraw_interval: Some(0.5),
            max_frames: None,
        });
        for _ in 0..3000 {
            app.advance(NO_EVENTS, 0.001);
        }

        assert_eq!(app.frames_rendered(), 6);
        let fps = app.fps().unwrap();
        assert!(fps > 1.5 && fps < 3.5, "fps {fps}");
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut app = running(LoopOptions::default());
        app.shutdown(ExitStatus::Success);
        app.shutdown(ExitStatus::Failure);
        assert_eq!(app.exit_status(), Some(ExitStatus::Success));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Failure.code(), 1);
    }
}
