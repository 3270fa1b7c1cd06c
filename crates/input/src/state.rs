use campuswalk_common::Time;

/// Pointer-up within this many milliseconds of pointer-down counts as a tap.
const TAP_WINDOW_MS: f64 = 100.0;

/// The fixed key set the simulation reacts to. Physical key bindings are
/// the platform collaborator's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Use,
    Emotion,
}

impl Key {
    pub const ALL: [Key; 6] = [
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::Use,
        Key::Emotion,
    ];

    fn index(self) -> usize {
        match self {
            Key::Left => 0,
            Key::Right => 1,
            Key::Up => 2,
            Key::Down => 3,
            Key::Use => 4,
            Key::Emotion => 5,
        }
    }
}

/// Most recent input device family, for UI branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Keyboard,
    Mouse,
    Touch,
}

/// Pointer state shared by mouse and touch.
#[derive(Debug, Clone, Default)]
pub struct Pointer {
    down_raw: bool,
    tap_raw: bool,
    pressed_at: f64,
    /// Held this frame.
    pub down: bool,
    /// Down edge this frame.
    pub pressed: bool,
    /// One-shot: pointer-up within the tap window of pointer-down (touch).
    pub tap: bool,
    /// Viewport-pixel position.
    pub x: f32,
    pub y: f32,
    /// Screen-space position: y in [-1, 1], x in [-aspect, aspect].
    pub graphic_x: f32,
    pub graphic_y: f32,
}

/// Edge-detected input tracker.
///
/// Platform callbacks mutate raw state at any point; `update` resolves the
/// derived held/pressed/released state once per frame.
#[derive(Debug)]
pub struct InputState {
    raw: [bool; 6],
    held: [bool; 6],
    pressed: [bool; 6],
    released: [bool; 6],
    /// Keys that were held when `disable` ran; their release edge is
    /// still owed on the next update.
    release_pending: [bool; 6],
    pub pointer: Pointer,
    pub mode: InputMode,
    disabled: bool,
    width: f32,
    height: f32,
}

impl InputState {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            raw: [false; 6],
            held: [false; 6],
            pressed: [false; 6],
            released: [false; 6],
            release_pending: [false; 6],
            pointer: Pointer::default(),
            mode: InputMode::default(),
            disabled: false,
            width,
            height,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Resolve per-frame edges. Must run before any system each frame.
    pub fn update(&mut self, _time: Time) {
        for key in Key::ALL {
            let i = key.index();
            let raw = self.raw[i] && !self.disabled;
            self.pressed[i] = raw && !self.held[i];
            self.released[i] = (self.held[i] || self.release_pending[i]) && !raw;
            self.release_pending[i] = false;
            self.held[i] = raw;
        }

        if self.disabled {
            self.pointer.pressed = false;
            self.pointer.down = false;
            self.pointer.tap = false;
        } else {
            self.pointer.pressed = self.pointer.down_raw && !self.pointer.down;
            self.pointer.down = self.pointer.down_raw;
            self.pointer.tap = self.pointer.tap_raw;
        }
        self.pointer.tap_raw = false;

        self.pointer.graphic_x = (self.pointer.x - self.width / 2.0) / (self.height / 2.0);
        self.pointer.graphic_y = -(self.pointer.y - self.height / 2.0) / (self.height / 2.0);
    }

    pub fn held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    pub fn released(&self, key: Key) -> bool {
        self.released[key.index()]
    }

    // --- platform callbacks ---

    pub fn on_key_down(&mut self, key: Key) {
        if !self.disabled {
            self.raw[key.index()] = true;
        }
        self.mode = InputMode::Keyboard;
    }

    /// Key-up is never gated by `disabled`: a key must not stay latched
    /// down across a modal.
    pub fn on_key_up(&mut self, key: Key) {
        self.raw[key.index()] = false;
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32, device: InputMode, now: f64) {
        self.mode = device;
        if !self.disabled {
            self.pointer.down_raw = true;
            self.pointer.x = x;
            self.pointer.y = y;
            if device == InputMode::Touch {
                self.pointer.pressed_at = now;
            }
        }
    }

    pub fn on_pointer_up(&mut self, device: InputMode, now: f64) {
        self.pointer.down_raw = false;
        if device == InputMode::Touch && now - self.pointer.pressed_at < TAP_WINDOW_MS {
            self.pointer.tap_raw = true;
        }
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if !self.disabled {
            self.pointer.x = x;
            self.pointer.y = y;
        }
    }

    // --- modal gating ---

    /// Suppress new input capture (while a modal is open). Held and
    /// pressed state drop immediately; the release edge still fires on
    /// the next update.
    pub fn disable(&mut self) {
        self.disabled = true;
        for i in 0..self.held.len() {
            self.release_pending[i] = self.release_pending[i] || self.held[i];
        }
        self.pressed = [false; 6];
        self.held = [false; 6];
        self.pointer.down = false;
        self.pointer.pressed = false;
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(input: &mut InputState) {
        input.update(Time::default());
    }

    #[test]
    fn pressed_fires_only_on_first_down_tick() {
        let mut input = InputState::new(800.0, 600.0);
        input.on_key_down(Key::Left);

        tick(&mut input);
        assert!(input.pressed(Key::Left));
        assert!(input.held(Key::Left));

        tick(&mut input);
        assert!(!input.pressed(Key::Left));
        assert!(input.held(Key::Left));

        tick(&mut input);
        assert!(!input.pressed(Key::Left));

        input.on_key_up(Key::Left);
        tick(&mut input);
        assert!(input.released(Key::Left));
        assert!(!input.held(Key::Left));

        tick(&mut input);
        assert!(!input.released(Key::Left));
    }

    #[test]
    fn tap_requires_quick_release() {
        let mut input = InputState::new(800.0, 600.0);
        input.on_pointer_down(10.0, 10.0, InputMode::Touch, 1000.0);
        input.on_pointer_up(InputMode::Touch, 1050.0);
        tick(&mut input);
        assert!(input.pointer.tap);

        // tap is one-shot
        tick(&mut input);
        assert!(!input.pointer.tap);

        input.on_pointer_down(10.0, 10.0, InputMode::Touch, 2000.0);
        input.on_pointer_up(InputMode::Touch, 2500.0);
        tick(&mut input);
        assert!(!input.pointer.tap);
    }

    #[test]
    fn pointer_pressed_edge() {
        let mut input = InputState::new(800.0, 600.0);
        input.on_pointer_down(0.0, 0.0, InputMode::Mouse, 0.0);
        tick(&mut input);
        assert!(input.pointer.pressed);
        assert!(input.pointer.down);
        tick(&mut input);
        assert!(!input.pointer.pressed);
        assert!(input.pointer.down);
    }

    #[test]
    fn mode_tracks_latest_device() {
        let mut input = InputState::new(800.0, 600.0);
        assert_eq!(input.mode, InputMode::Keyboard);
        input.on_pointer_down(0.0, 0.0, InputMode::Touch, 0.0);
        assert_eq!(input.mode, InputMode::Touch);
        input.on_key_down(Key::Use);
        assert_eq!(input.mode, InputMode::Keyboard);
    }

    #[test]
    fn disable_forces_held_false_but_release_edge_fires() {
        let mut input = InputState::new(800.0, 600.0);
        input.on_key_down(Key::Use);
        tick(&mut input);
        assert!(input.held(Key::Use));

        input.disable();
        assert!(!input.held(Key::Use));
        tick(&mut input);
        // release edge fires once even though no key-up arrived
        assert!(input.released(Key::Use));
        assert!(!input.pressed(Key::Use));

        // no new capture while disabled
        input.on_key_down(Key::Left);
        tick(&mut input);
        assert!(!input.held(Key::Left));

        // the physical key is still down; enabling re-latches it
        input.enable();
        tick(&mut input);
        assert!(input.pressed(Key::Use));
    }

    #[test]
    fn graphic_coordinates_are_aspect_scaled() {
        let mut input = InputState::new(800.0, 600.0);
        input.on_pointer_move(800.0, 0.0);
        tick(&mut input);
        let aspect = 800.0 / 600.0;
        assert!((input.pointer.graphic_x - aspect).abs() < 1e-6);
        assert!((input.pointer.graphic_y - 1.0).abs() < 1e-6);

        input.on_pointer_move(400.0, 300.0);
        tick(&mut input);
        assert_eq!(input.pointer.graphic_x, 0.0);
        assert_eq!(input.pointer.graphic_y, 0.0);
    }
}
