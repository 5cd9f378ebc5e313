// Control aggregator - folds keyboard, touch and mouse input into one ControlVector

use super::action::{Action, Command, InputSource};
use super::config::InputConfig;
use super::control::ControlVector;
use super::touch::{PointerRole, TouchLayout};
use glam::Vec2;
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase};
use winit::keyboard::PhysicalKey;

/// Pointer id reserved for the mouse so it never collides with touch ids
pub const MOUSE_POINTER_ID: u64 = u64::MAX;

/// Owns the control vector and every input source that writes into it.
///
/// Sources write only their own axes and the most recent write wins; there is
/// no blending between a key and a touch on the same axis.
pub struct ControlAggregator {
    /// Key bindings
    config: InputConfig,

    /// Touch control geometry
    layout: TouchLayout,

    /// The current control vector
    control: ControlVector,

    /// Pointers that are currently down, with the role they took on press
    pointers: HashMap<u64, PointerRole>,

    /// Latest (throttle, brake) reading of each pedal pointer
    pedals: HashMap<u64, (f32, f32)>,

    /// Last known mouse position in pixels
    cursor: Vec2,
}

impl ControlAggregator {
    /// Create a new aggregator
    pub fn new(config: InputConfig, layout: TouchLayout) -> Self {
        Self {
            config,
            layout,
            control: ControlVector::NEUTRAL,
            pointers: HashMap::new(),
            pedals: HashMap::new(),
            cursor: Vec2::ZERO,
        }
    }

    /// The current control vector
    pub fn control(&self) -> ControlVector {
        self.control
    }

    /// Whether a steering pad drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.pointers
            .values()
            .any(|role| matches!(role, PointerRole::Pad { .. }))
    }

    /// Register a press of a bound action
    pub fn press(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::SteerLeft => self.control.steer = -1.0,
            Action::SteerRight => self.control.steer = 1.0,
            Action::Throttle => self.control.throttle = 1.0,
            Action::Brake => self.control.brake = 1.0,
            Action::Boost => self.control.boost = true,
            Action::ToggleCamera | Action::StartAudio => {}
        }
        action.command()
    }

    /// Register a release of a bound action
    pub fn release(&mut self, action: Action) {
        match action {
            Action::SteerLeft | Action::SteerRight => {
                // An active drag owns steering until it lifts
                if !self.is_dragging() {
                    self.control.steer = 0.0;
                }
            }
            Action::Throttle => self.control.throttle = 0.0,
            Action::Brake => self.control.brake = 0.0,
            Action::Boost => self.control.boost = false,
            Action::ToggleCamera | Action::StartAudio => {}
        }
    }

    /// Handle a key transition for a bound source. Repeats are ignored.
    pub fn process_key(
        &mut self,
        source: InputSource,
        pressed: bool,
        repeat: bool,
    ) -> Option<Command> {
        let action = self.config.get_action(source)?;
        if pressed {
            if repeat {
                return None;
            }
            self.press(action)
        } else {
            self.release(action);
            None
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> Option<Command> {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return None;
        };
        self.process_key(
            InputSource::key(key_code),
            event.state == ElementState::Pressed,
            event.repeat,
        )
    }

    /// A pointer went down at `pos` (pixels) on a screen of size `screen`
    pub fn pointer_down(&mut self, id: u64, pos: Vec2, screen: Vec2) {
        let role = self.layout.classify(pos, screen);
        self.pointers.insert(id, role);
        match role {
            PointerRole::Pad { .. } => self.control.steer = 0.0,
            PointerRole::Button(action) => {
                self.press(action);
            }
            PointerRole::Pedal => self.apply_pedal(id, pos, screen),
        }
    }

    /// A pointer that is down moved to `pos`
    pub fn pointer_move(&mut self, id: u64, pos: Vec2, screen: Vec2) {
        match self.pointers.get(&id).copied() {
            Some(PointerRole::Pad { origin }) => {
                self.control.steer = self.layout.pad_steer(origin, pos);
            }
            Some(PointerRole::Pedal) => self.apply_pedal(id, pos, screen),
            Some(PointerRole::Button(_)) | None => {}
        }
    }

    /// A pointer lifted or was cancelled
    pub fn pointer_up(&mut self, id: u64) {
        match self.pointers.remove(&id) {
            Some(PointerRole::Pad { .. }) => self.control.steer = 0.0,
            Some(PointerRole::Button(action)) => self.release(action),
            Some(PointerRole::Pedal) => {
                self.pedals.remove(&id);
                self.update_pedals();
            }
            None => {}
        }
    }

    /// Process a touch event from winit
    pub fn process_touch(&mut self, touch: &Touch, screen: Vec2) {
        let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => self.pointer_down(touch.id, pos, screen),
            TouchPhase::Moved => self.pointer_move(touch.id, pos, screen),
            TouchPhase::Ended | TouchPhase::Cancelled => self.pointer_up(touch.id),
        }
    }

    /// Track the mouse cursor; drags behave like a touch pointer
    pub fn process_cursor_moved(&mut self, pos: Vec2, screen: Vec2) {
        self.cursor = pos;
        self.pointer_move(MOUSE_POINTER_ID, pos, screen);
    }

    /// Process a mouse button event; only the left button acts as a pointer
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState, screen: Vec2) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => self.pointer_down(MOUSE_POINTER_ID, self.cursor, screen),
            ElementState::Released => self.pointer_up(MOUSE_POINTER_ID),
        }
    }

    /// Drop every held input, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.pedals.clear();
        self.control = ControlVector::NEUTRAL;
    }

    fn apply_pedal(&mut self, id: u64, pos: Vec2, screen: Vec2) {
        self.pedals.insert(id, self.layout.pedal(pos, screen));
        self.update_pedals();
    }

    /// Pedal axes follow the strongest reading among pedal pointers still down
    fn update_pedals(&mut self) {
        let (throttle, brake) = self
            .pedals
            .values()
            .fold((0.0f32, 0.0f32), |(t, b), &(pt, pb)| (t.max(pt), b.max(pb)));
        self.control.throttle = throttle;
        self.control.brake = brake;
    }
}

impl Default for ControlAggregator {
    fn default() -> Self {
        Self::new(InputConfig::standard(false), TouchLayout::classic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use winit::keyboard::KeyCode;

    const SCREEN: Vec2 = Vec2::new(1000.0, 500.0);

    fn boosted() -> ControlAggregator {
        ControlAggregator::new(InputConfig::standard(true), TouchLayout::with_boost_button())
    }

    #[test]
    fn test_starts_neutral() {
        let aggregator = ControlAggregator::default();
        assert!(aggregator.control().is_neutral());
        assert!(!aggregator.is_dragging());
    }

    #[test]
    fn test_key_press_and_release() {
        let mut aggregator = ControlAggregator::default();
        let w = InputSource::key(KeyCode::KeyW);

        aggregator.process_key(w, true, false);
        assert_eq!(aggregator.control().throttle, 1.0);

        aggregator.process_key(w, false, false);
        assert_eq!(aggregator.control().throttle, 0.0);
    }

    #[test]
    fn test_release_only_resets_own_axis() {
        let mut aggregator = ControlAggregator::default();
        aggregator.press(Action::Throttle);
        aggregator.press(Action::SteerLeft);
        aggregator.press(Action::Brake);

        aggregator.release(Action::Brake);
        let control = aggregator.control();
        assert_eq!(control.brake, 0.0);
        assert_eq!(control.throttle, 1.0);
        assert_eq!(control.steer, -1.0);
    }

    #[test]
    fn test_last_steer_write_wins() {
        let mut aggregator = ControlAggregator::default();
        aggregator.press(Action::SteerLeft);
        aggregator.press(Action::SteerRight);
        assert_eq!(aggregator.control().steer, 1.0);

        // Touch drag overrides the key until the next key event
        aggregator.pointer_down(7, Vec2::new(200.0, 300.0), SCREEN);
        aggregator.pointer_move(7, Vec2::new(155.0, 300.0), SCREEN);
        assert_relative_eq!(aggregator.control().steer, -0.5);

        aggregator.press(Action::SteerRight);
        assert_eq!(aggregator.control().steer, 1.0);
    }

    #[test]
    fn test_key_release_does_not_clobber_drag() {
        let mut aggregator = ControlAggregator::default();
        aggregator.press(Action::SteerLeft);
        aggregator.pointer_down(1, Vec2::new(200.0, 300.0), SCREEN);
        aggregator.pointer_move(1, Vec2::new(290.0, 300.0), SCREEN);
        assert_eq!(aggregator.control().steer, 1.0);

        aggregator.release(Action::SteerLeft);
        assert_eq!(aggregator.control().steer, 1.0);

        aggregator.pointer_up(1);
        assert_eq!(aggregator.control().steer, 0.0);
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut aggregator = ControlAggregator::default();
        let c = InputSource::key(KeyCode::KeyC);
        assert_eq!(aggregator.process_key(c, true, false), Some(Command::ToggleCamera));
        assert_eq!(aggregator.process_key(c, true, true), None);
        assert_eq!(aggregator.process_key(c, false, false), None);
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut aggregator = ControlAggregator::default();
        let space = InputSource::key(KeyCode::Space);
        assert_eq!(aggregator.process_key(space, true, false), None);
        assert!(aggregator.control().is_neutral());
    }

    #[test]
    fn test_boost_key_in_boost_build() {
        let mut aggregator = boosted();
        aggregator.process_key(InputSource::key(KeyCode::Space), true, false);
        assert!(aggregator.control().boost);
        aggregator.process_key(InputSource::key(KeyCode::Space), false, false);
        assert!(!aggregator.control().boost);
    }

    #[test]
    fn test_pedal_pointer() {
        let mut aggregator = ControlAggregator::default();
        aggregator.pointer_down(3, Vec2::new(800.0, 155.0), SCREEN);
        assert_relative_eq!(aggregator.control().throttle, 0.5);

        aggregator.pointer_move(3, Vec2::new(800.0, 390.0), SCREEN);
        assert_eq!(aggregator.control().throttle, 0.0);
        assert_relative_eq!(aggregator.control().brake, 0.5);

        aggregator.pointer_up(3);
        assert!(aggregator.control().is_neutral());
    }

    #[test]
    fn test_lifting_one_pedal_keeps_the_other() {
        let mut aggregator = ControlAggregator::default();
        aggregator.pointer_down(3, Vec2::new(800.0, 155.0), SCREEN);
        aggregator.pointer_down(4, Vec2::new(820.0, 390.0), SCREEN);
        assert_relative_eq!(aggregator.control().throttle, 0.5);
        assert_relative_eq!(aggregator.control().brake, 0.5);

        aggregator.pointer_up(4);
        assert_relative_eq!(aggregator.control().throttle, 0.5);
        assert_eq!(aggregator.control().brake, 0.0);

        aggregator.pointer_up(3);
        assert!(aggregator.control().is_neutral());
    }

    #[test]
    fn test_hold_button_pointer() {
        let mut aggregator = boosted();
        aggregator.pointer_down(4, Vec2::new(900.0, 50.0), SCREEN);
        assert!(aggregator.control().boost);
        assert_eq!(aggregator.control().throttle, 0.0);

        aggregator.pointer_up(4);
        assert!(!aggregator.control().boost);
    }

    #[test]
    fn test_pad_and_pedal_together() {
        let mut aggregator = ControlAggregator::default();
        aggregator.pointer_down(1, Vec2::new(100.0, 300.0), SCREEN);
        aggregator.pointer_down(2, Vec2::new(800.0, 30.0), SCREEN);
        aggregator.pointer_move(1, Vec2::new(55.0, 300.0), SCREEN);

        let control = aggregator.control();
        assert_relative_eq!(control.steer, -0.5);
        assert_relative_eq!(control.throttle, 1.0);

        aggregator.pointer_up(2);
        assert_relative_eq!(aggregator.control().steer, -0.5);
        assert_eq!(aggregator.control().throttle, 0.0);
    }

    #[test]
    fn test_unknown_pointer_is_ignored() {
        let mut aggregator = ControlAggregator::default();
        aggregator.pointer_move(42, Vec2::new(10.0, 10.0), SCREEN);
        aggregator.pointer_up(42);
        assert!(aggregator.control().is_neutral());
    }

    #[test]
    fn test_mouse_drag_steers() {
        let mut aggregator = ControlAggregator::default();
        aggregator.process_cursor_moved(Vec2::new(200.0, 200.0), SCREEN);
        aggregator.process_mouse_button(MouseButton::Left, ElementState::Pressed, SCREEN);
        aggregator.process_cursor_moved(Vec2::new(245.0, 200.0), SCREEN);
        assert_relative_eq!(aggregator.control().steer, 0.5);

        aggregator.process_mouse_button(MouseButton::Left, ElementState::Released, SCREEN);
        assert_eq!(aggregator.control().steer, 0.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut aggregator = boosted();
        aggregator.press(Action::Throttle);
        aggregator.press(Action::Boost);
        aggregator.pointer_down(1, Vec2::new(100.0, 100.0), SCREEN);

        aggregator.reset();
        assert!(aggregator.control().is_neutral());
        assert!(!aggregator.is_dragging());
    }
}
