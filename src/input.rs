use crate::camera::Camera;
use crate::config::InputConfig;
use crate::error::is_positive;
use glam::Vec2;
use log::{debug, warn};
use std::collections::HashSet;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys the map reacts to.
///
/// Uses physical key codes (layout-independent).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Q,
    E,
    Minus,
    Equal,
    Escape,
}

impl Key {
    fn from_keycode(code: KeyCode) -> Option<Self> {
        Some(match code {
            KeyCode::ArrowLeft => Key::Left,
            KeyCode::ArrowRight => Key::Right,
            KeyCode::ArrowUp => Key::Up,
            KeyCode::ArrowDown => Key::Down,
            KeyCode::KeyQ => Key::Q,
            KeyCode::KeyE => Key::E,
            KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
            KeyCode::Equal | KeyCode::NumpadAdd => Key::Equal,
            KeyCode::Escape => Key::Escape,
            _ => return None,
        })
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(mouse_button: WinitMouseButton) -> Option<Self> {
        Some(match mouse_button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => return None,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys_down: HashSet<Key>,
    mouse_down: HashSet<MouseButton>,
    cursor: Option<Vec2>,
}

impl InputState {
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button)
    }

    /// Last known cursor position, `None` until the first cursor event.
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }
}

/// Turns window events into camera operations.
///
/// - left drag pans,
/// - the wheel zooms around the cursor,
/// - Q / E rotate around the cursor,
/// - `-` / `=` zoom around the window center,
/// - arrow keys pan,
/// - Escape or closing the window raises [`CameraController::close_requested`].
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    config: InputConfig,
    input: InputState,
    close_requested: bool,
}

impl CameraController {
    pub fn new(camera: Camera, config: InputConfig) -> Self {
        CameraController {
            camera,
            config,
            input: InputState::default(),
            close_requested: false,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.handle_resized(*size),
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_keyboard_input(event.physical_key, event.state)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(*button, *state)
            }
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor_moved(*position),
            WindowEvent::CursorLeft { .. } => self.input.cursor = None,
            WindowEvent::MouseWheel { delta, .. } => self.handle_mouse_wheel(*delta),
            _ => {}
        }
    }

    pub fn handle_keyboard_input(&mut self, physical_key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = physical_key else {
            return;
        };
        let Some(key) = Key::from_keycode(code) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                self.input.keys_down.insert(key);
                self.apply_key(key);
            }
            ElementState::Released => {
                self.input.keys_down.remove(&key);
            }
        }
    }

    pub fn handle_mouse_button(&mut self, button: WinitMouseButton, state: ElementState) {
        let Some(button) = MouseButton::from_winit(button) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                self.input.mouse_down.insert(button);
            }
            ElementState::Released => {
                self.input.mouse_down.remove(&button);
            }
        }
    }

    /// Pans by the cursor delta while the left button is held. The first
    /// sample only records the position.
    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let cursor = Vec2::new(position.x as f32, position.y as f32);
        if let Some(last) = self.input.cursor
            && self.input.is_mouse_button_down(MouseButton::Left)
        {
            let delta = cursor - last;
            self.camera.pan(delta.x, delta.y);
        }
        self.input.cursor = Some(cursor);
    }

    /// Wheel up (positive lines) zooms in around the cursor.
    pub fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => self.config.wheel_lines(p.y as f32),
        };
        if lines == 0.0 {
            return;
        }

        let scale_factor = 1.0 - lines * self.config.zoom_step;
        if !is_positive(scale_factor) {
            warn!(
                "dropping wheel step of {} lines: scale factor {} is not positive",
                lines, scale_factor
            );
            return;
        }

        let anchor = self.anchor();
        self.camera.zoom(scale_factor, anchor.x, anchor.y);
    }

    pub fn handle_resized(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            debug!("ignoring resize to {}x{}", size.width, size.height);
            return;
        }
        if let Err(e) = self.camera.resize(size.width as f32, size.height as f32) {
            warn!("resize rejected: {}", e);
        }
    }

    fn apply_key(&mut self, key: Key) {
        let step = self.config.key_pan_px;
        match key {
            Key::Left => self.camera.pan(step, 0.0),
            Key::Right => self.camera.pan(-step, 0.0),
            Key::Up => self.camera.pan(0.0, step),
            Key::Down => self.camera.pan(0.0, -step),
            Key::Q | Key::E => {
                let angle = if key == Key::Q {
                    -self.config.rotate_step
                } else {
                    self.config.rotate_step
                };
                let anchor = self.anchor();
                self.camera.rotate(angle, anchor.x, anchor.y);
            }
            Key::Minus | Key::Equal => {
                let scale_factor = if key == Key::Equal {
                    1.0 - self.config.zoom_step
                } else {
                    1.0 + self.config.zoom_step
                };
                if !is_positive(scale_factor) {
                    warn!("dropping key zoom: scale factor {} is not positive", scale_factor);
                    return;
                }
                let center = self.camera.window_size() / 2.0;
                self.camera.zoom(scale_factor, center.x, center.y);
            }
            Key::Escape => self.close_requested = true,
        }
    }

    // Cursor when known, window center otherwise.
    fn anchor(&self) -> Vec2 {
        self.input
            .cursor
            .unwrap_or(self.camera.window_size() / 2.0)
    }
}
