use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use super::build_presenter;
use super::input_adapter::translate;
use crate::config::AppConfig;
use crate::core::{AppLoop, ExitStatus, FrameRenderer, LoopEvent, LoopState, Presenter};

/// Bridges winit callbacks onto the render loop.
///
/// Events collected during one pump are handed to the loop as a batch in
/// `about_to_wait`. The loop is declared before the window so the presenter
/// is dropped while the window it draws to still exists. GPU presenters in
/// turn release their swapchain before the device it was created on.
pub struct WinitApp {
    app: AppLoop<Box<dyn Presenter>>,
    config: AppConfig,
    pending: Vec<LoopEvent>,
    window: Option<Arc<Window>>,
}

impl WinitApp {
    pub fn new(config: AppConfig) -> Self {
        let app = AppLoop::new(FrameRenderer::new(config.scene), config.loop_options());
        Self {
            app,
            config,
            pending: Vec::new(),
            window: None,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        self.app.exit_status().unwrap_or(ExitStatus::Failure)
    }

    fn open_window(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Arc<Window>> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = event_loop
            .create_window(attributes)
            .map_err(|err| anyhow!("failed to create window: {err}"))?;
        Ok(Arc::new(window))
    }

    fn finish_if_terminated(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.state() == LoopState::Terminated {
            self.window = None;
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.state() != LoopState::Uninitialized {
            return;
        }

        let presenter = self.open_window(event_loop).and_then(|window| {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };
            log::info!("window open at {}x{}, backend {:?}", width, height, self.config.backend);
            self.window = Some(window.clone());
            build_presenter(&self.config, window, width, height)
        });

        self.app.start(presenter);
        self.finish_if_terminated(event_loop);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(event) = translate(&event) {
            self.pending.push(event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.state() == LoopState::Running {
            let events = std::mem::take(&mut self.pending);
            self.app.step(events);
        }
        // Wake for the next throttled frame
        if let Some(ms) = self.config.redraw_interval_ms {
            event_loop.set_control_flow(ControlFlow::wait_duration(Duration::from_millis(ms)));
        }
        self.finish_if_terminated(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.shutdown(ExitStatus::Success);
        self.window = None;
    }
}
