// Driving action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Represents all possible driving actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Held axes
    SteerLeft,
    SteerRight,
    Throttle,
    Brake,
    Boost,

    // One-shot commands
    ToggleCamera,
    StartAudio,
}

impl Action {
    /// The discrete command this action triggers on press, if any
    pub fn command(&self) -> Option<Command> {
        match self {
            Action::ToggleCamera => Some(Command::ToggleCamera),
            Action::StartAudio => Some(Command::StartAudio),
            _ => None,
        }
    }
}

/// Discrete requests handed back to the session instead of touching the control vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleCamera,
    StartAudio,
}

/// Represents an input source that can be bound to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings (arrows and WASD)
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowLeft), Action::SteerLeft),
        (InputSource::key(KeyCode::KeyA), Action::SteerLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::SteerRight),
        (InputSource::key(KeyCode::KeyD), Action::SteerRight),
        (InputSource::key(KeyCode::ArrowUp), Action::Throttle),
        (InputSource::key(KeyCode::KeyW), Action::Throttle),
        (InputSource::key(KeyCode::ArrowDown), Action::Brake),
        (InputSource::key(KeyCode::KeyS), Action::Brake),
        (InputSource::key(KeyCode::KeyC), Action::ToggleCamera),
        (InputSource::key(KeyCode::KeyM), Action::StartAudio),
    ]
}

/// Extra bindings for builds that expose an explicit boost control
pub fn boost_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::Space), Action::Boost),
        (InputSource::key(KeyCode::ShiftLeft), Action::Boost),
        (InputSource::key(KeyCode::ShiftRight), Action::Boost),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_source_keyboard_creation() {
        let source = InputSource::key(KeyCode::KeyA);
        assert_eq!(source, InputSource::Keyboard(KeyCode::KeyA));
    }

    #[test]
    fn test_only_one_shot_actions_produce_commands() {
        assert_eq!(Action::ToggleCamera.command(), Some(Command::ToggleCamera));
        assert_eq!(Action::StartAudio.command(), Some(Command::StartAudio));
        assert_eq!(Action::Throttle.command(), None);
        assert_eq!(Action::Boost.command(), None);
    }

    #[test]
    fn test_default_bindings_cover_arrows_and_wasd() {
        let bindings = default_bindings();
        let find = |code| {
            bindings
                .iter()
                .find(|(s, _)| *s == InputSource::key(code))
                .map(|(_, a)| *a)
        };

        assert_eq!(find(KeyCode::ArrowLeft), Some(Action::SteerLeft));
        assert_eq!(find(KeyCode::KeyA), Some(Action::SteerLeft));
        assert_eq!(find(KeyCode::KeyD), Some(Action::SteerRight));
        assert_eq!(find(KeyCode::KeyW), Some(Action::Throttle));
        assert_eq!(find(KeyCode::ArrowDown), Some(Action::Brake));
        assert_eq!(find(KeyCode::KeyC), Some(Action::ToggleCamera));
    }

    #[test]
    fn test_default_bindings_have_no_boost() {
        assert!(default_bindings().iter().all(|(_, a)| *a != Action::Boost));
        assert!(boost_bindings().iter().all(|(_, a)| *a == Action::Boost));
    }

    #[test]
    fn test_no_duplicate_sources() {
        let mut seen_sources = std::collections::HashSet::new();
        for (source, _) in default_bindings().into_iter().chain(boost_bindings()) {
            assert!(
                seen_sources.insert(source),
                "Duplicate input source found in bindings"
            );
        }
    }
}
