//! Input state and per-tick snapshots
//!
//! Host events land in `InputState` whenever they arrive. The tick consumes a
//! `TickInput` snapshot exactly once, which clears accumulated deltas and
//! one-shot flags.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pointer travel (pixels) under which a press/release counts as a click
pub const CLICK_SLOP: f32 = 5.0;

/// Logical keys the simulation cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` or `.key` string
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "w" | "W" | "ArrowUp" => Some(Key::Forward),
            "KeyS" | "s" | "S" | "ArrowDown" => Some(Key::Back),
            "KeyA" | "a" | "A" | "ArrowLeft" => Some(Key::Left),
            "KeyD" | "d" | "D" | "ArrowRight" => Some(Key::Right),
            "Space" | " " => Some(Key::Jump),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Raw events from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: PointerButton },
    /// `dx`/`dy` are relative motion (the only useful part while locked)
    PointerMove { x: f32, y: f32, dx: f32, dy: f32 },
    PointerUp { x: f32, y: f32, button: PointerButton },
    Wheel { delta: f32 },
    KeyDown(Key),
    KeyUp(Key),
    PointerLockChanged(bool),
    Resize { width: f32, height: f32 },
}

/// Directional keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// x = right - left, y = forward - back
    pub fn axis(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.forward as i32 - self.back as i32;
        Vec2::new(x as f32, y as f32)
    }

    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub keys: MoveKeys,
    pub jump: bool,
    /// Primary button held while pointer-locked
    pub fire: bool,
    pub pointer_locked: bool,
    /// Pointer-lock relative motion since last tick (pixels)
    pub look_delta: Vec2,
    /// Unlocked drag motion since last tick (pixels)
    pub drag_delta: Vec2,
    pub wheel: f32,
    /// Click position in normalized device coordinates
    pub click: Option<Vec2>,
    /// Viewport width / height
    pub aspect: f32,
}

/// Accumulates host events between ticks
#[derive(Debug, Clone)]
pub struct InputState {
    keys: MoveKeys,
    jump: bool,
    primary_down: bool,
    pointer_locked: bool,
    look_delta: Vec2,
    drag_delta: Vec2,
    wheel: f32,
    click: Option<Vec2>,
    press_pos: Option<Vec2>,
    travel: f32,
    viewport: Vec2,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: MoveKeys::default(),
            jump: false,
            primary_down: false,
            pointer_locked: false,
            look_delta: Vec2::ZERO,
            drag_delta: Vec2::ZERO,
            wheel: 0.0,
            click: None,
            press_pos: None,
            travel: 0.0,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}

impl InputState {
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y, button } => {
                if button == PointerButton::Primary {
                    self.primary_down = true;
                    if !self.pointer_locked {
                        self.press_pos = Some(Vec2::new(x, y));
                        self.travel = 0.0;
                    }
                }
            }
            InputEvent::PointerMove { dx, dy, .. } => {
                let delta = Vec2::new(dx, dy);
                if self.pointer_locked {
                    self.look_delta += delta;
                } else if self.primary_down {
                    self.drag_delta += delta;
                    self.travel += delta.length();
                }
            }
            InputEvent::PointerUp { x, y, button } => {
                if button == PointerButton::Primary {
                    self.primary_down = false;
                    if self.press_pos.take().is_some() && self.travel < CLICK_SLOP {
                        self.click = Some(self.to_ndc(Vec2::new(x, y)));
                    }
                }
            }
            InputEvent::Wheel { delta } => self.wheel += delta,
            InputEvent::KeyDown(key) => self.set_key(key, true),
            InputEvent::KeyUp(key) => self.set_key(key, false),
            InputEvent::PointerLockChanged(locked) => {
                self.pointer_locked = locked;
                self.press_pos = None;
                if !locked {
                    // Releasing the lock swallows the button-up
                    self.primary_down = false;
                }
            }
            InputEvent::Resize { width, height } => {
                if width > 0.0 && height > 0.0 {
                    self.viewport = Vec2::new(width, height);
                } else {
                    log::warn!("Ignoring degenerate viewport {}x{}", width, height);
                }
            }
        }
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Forward => self.keys.forward = down,
            Key::Back => self.keys.back = down,
            Key::Left => self.keys.left = down,
            Key::Right => self.keys.right = down,
            Key::Jump => self.jump = down,
        }
    }

    /// Screen pixels (origin top-left, +y down) to NDC (+y up)
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            -(screen.y / self.viewport.y * 2.0 - 1.0),
        )
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    /// Take this tick's input, resetting accumulators and one-shots
    pub fn snapshot(&mut self) -> TickInput {
        let input = TickInput {
            keys: self.keys,
            jump: self.jump,
            fire: self.pointer_locked && self.primary_down,
            pointer_locked: self.pointer_locked,
            look_delta: self.look_delta,
            drag_delta: self.drag_delta,
            wheel: self.wheel,
            click: self.click,
            aspect: self.aspect(),
        };
        self.look_delta = Vec2::ZERO;
        self.drag_delta = Vec2::ZERO;
        self.wheel = 0.0;
        self.click = None;
        input
    }
}
