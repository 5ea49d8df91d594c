//! Window-system side: presenters for each backend and the winit driver.

pub mod gpu_presenter;
pub mod headless;
pub mod input_adapter;
pub mod runner;
pub mod software_presenter;
pub mod texture_presenter;

use std::sync::Arc;

use anyhow::{bail, Context};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::Window;

use crate::config::{AppConfig, Backend};
use crate::core::{ExitStatus, Presenter};
use crate::gpu::GpuContext;

pub use gpu_presenter::GpuPresenter;
pub use headless::HeadlessPresenter;
pub use runner::WinitApp;
pub use software_presenter::SoftwarePresenter;
pub use texture_presenter::TexturePresenter;

/// Build the display path the config asks for on an open window
pub fn build_presenter(
    config: &AppConfig,
    window: Arc<Window>,
    width: u32,
    height: u32,
) -> anyhow::Result<Box<dyn Presenter>> {
    let presenter: Box<dyn Presenter> = match config.backend {
        Backend::Gpu => {
            let (context, target) = pollster::block_on(GpuContext::for_window(window))?;
            Box::new(GpuPresenter::new(Arc::new(context), target, width, height)?)
        }
        Backend::Raster => {
            let (context, target) = pollster::block_on(GpuContext::for_window(window))?;
            Box::new(TexturePresenter::new(
                Arc::new(context),
                target,
                config.row_order,
                width,
                height,
            )?)
        }
        Backend::Software => {
            Box::new(SoftwarePresenter::new(window, config.row_order, width, height)?)
        }
        Backend::Headless => bail!("headless backend has no window presenter"),
    };
    Ok(presenter)
}

/// Run until the window closes, the frame budget is spent or setup fails
pub fn run(config: AppConfig) -> anyhow::Result<ExitStatus> {
    if config.backend == Backend::Headless {
        return Ok(headless::run(&config));
    }

    let event_loop = EventLoop::new().context("failed to initialize windowing toolkit")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = WinitApp::new(config);
    event_loop.run_app(&mut app).context("event loop terminated abnormally")?;
    Ok(app.exit_status())
}
