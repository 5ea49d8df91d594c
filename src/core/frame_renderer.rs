use glam::Vec2;
use serde::Deserialize;

use super::canvas::{DrawCommand, DrawTarget, Rect};
use super::color::Color;

const STROKE_WIDTH: f32 = 3.0;

/// The fixed frames this harness knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scene {
    /// Red line from (100, 100) to (700, 500) on white
    #[default]
    DiagonalLine,
    /// Red line from (100, 100) to (100, 500) on white
    VerticalLine,
    /// Blue rectangle [100, 200, 300, 500] on white
    BlueRect,
}

impl Scene {
    pub fn commands(&self) -> Vec<DrawCommand> {
        let background = DrawCommand::Clear(Color::WHITE);
        match self {
            Scene::DiagonalLine => vec![
                background,
                DrawCommand::StrokeLine {
                    from: Vec2::new(100.0, 100.0),
                    to: Vec2::new(700.0, 500.0),
                    width: STROKE_WIDTH,
                    color: Color::RED,
                },
            ],
            Scene::VerticalLine => vec![
                background,
                DrawCommand::StrokeLine {
                    from: Vec2::new(100.0, 100.0),
                    to: Vec2::new(100.0, 500.0),
                    width: STROKE_WIDTH,
                    color: Color::RED,
                },
            ],
            Scene::BlueRect => vec![
                background,
                DrawCommand::FillRect {
                    rect: Rect::from_ltrb(100.0, 200.0, 300.0, 500.0),
                    color: Color::BLUE,
                },
            ],
        }
    }
}

/// Issues one scene's commands per frame
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    commands: Vec<DrawCommand>,
}

impl FrameRenderer {
    pub fn new(scene: Scene) -> Self {
        Self::from_commands(scene.commands())
    }

    pub fn from_commands(commands: Vec<DrawCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Draw the whole frame in order; later commands paint over earlier ones
    pub fn render_frame(&self, target: &mut dyn DrawTarget) {
        for command in &self.commands {
            target.execute(command);
        }
    }
}
