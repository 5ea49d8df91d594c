use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::core::{Key, LoopEvent};

/// Map a winit window event to the loop's vocabulary. Events the loop does
/// not act on, key releases and auto-repeats map to `None`.
pub fn translate(event: &WindowEvent) -> Option<LoopEvent> {
    match event {
        WindowEvent::CloseRequested => Some(LoopEvent::CloseRequested),
        WindowEvent::Resized(size) => Some(LoopEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput { event, .. } => translate_key(event),
        _ => None,
    }
}

fn translate_key(event: &KeyEvent) -> Option<LoopEvent> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match event.physical_key {
        PhysicalKey::Code(code) => Some(LoopEvent::KeyPressed(key_for(code))),
        PhysicalKey::Unidentified(_) => Some(LoopEvent::KeyPressed(Key::Other)),
    }
}

pub fn key_for(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Space => Key::Space,
        _ => Key::Other,
    }
}
