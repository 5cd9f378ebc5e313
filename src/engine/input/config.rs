// Key binding configuration and remapping

use super::action::{self, Action, InputSource};
use std::collections::HashMap;

/// Maps input sources (keys) to driving actions
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    /// Mapping from input sources to actions
    bindings: HashMap<InputSource, Action>,

    /// Reverse mapping for quick lookups (action -> all sources)
    action_to_sources: HashMap<Action, Vec<InputSource>>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Default bindings, with the boost keys added when `with_boost` is set
    pub fn standard(with_boost: bool) -> Self {
        let mut bindings = action::default_bindings();
        if with_boost {
            bindings.extend(action::boost_bindings());
        }
        Self::from_bindings(bindings)
    }

    /// Bind an input source to an action
    pub fn bind(&mut self, source: InputSource, action: Action) {
        // A source drives exactly one action
        self.unbind_source(source);

        self.bindings.insert(source, action);
        self.action_to_sources
            .entry(action)
            .or_default()
            .push(source);
    }

    /// Unbind an input source
    pub fn unbind_source(&mut self, source: InputSource) {
        if let Some(action) = self.bindings.remove(&source) {
            if let Some(sources) = self.action_to_sources.get_mut(&action) {
                sources.retain(|s| *s != source);
                if sources.is_empty() {
                    self.action_to_sources.remove(&action);
                }
            }
        }
    }

    /// Unbind all sources for an action
    #[allow(dead_code)]
    pub fn unbind_action(&mut self, action: Action) {
        if let Some(sources) = self.action_to_sources.remove(&action) {
            for source in sources {
                self.bindings.remove(&source);
            }
        }
    }

    /// Get the action bound to an input source
    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    /// Get all input sources bound to an action
    #[allow(dead_code)]
    pub fn get_sources(&self, action: Action) -> Vec<InputSource> {
        self.action_to_sources
            .get(&action)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if an action has any bindings
    #[allow(dead_code)]
    pub fn has_binding(&self, action: Action) -> bool {
        self.action_to_sources.contains_key(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_action() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyJ);
        config.bind(source, Action::SteerLeft);

        assert_eq!(config.get_action(source), Some(Action::SteerLeft));
    }

    #[test]
    fn test_unbind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyJ);
        config.bind(source, Action::SteerLeft);
        config.unbind_source(source);

        assert_eq!(config.get_action(source), None);
        assert!(!config.has_binding(Action::SteerLeft));
    }

    #[test]
    fn test_unbind_action() {
        let mut config = InputConfig::standard(false);
        config.unbind_action(Action::SteerLeft);

        assert_eq!(config.get_action(InputSource::key(KeyCode::KeyA)), None);
        assert_eq!(config.get_action(InputSource::key(KeyCode::ArrowLeft)), None);
        assert!(config.get_sources(Action::SteerLeft).is_empty());
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);

        config.bind(source, Action::SteerLeft);
        config.bind(source, Action::SteerRight);

        assert_eq!(config.get_action(source), Some(Action::SteerRight));
        assert!(!config.has_binding(Action::SteerLeft));
    }

    #[test]
    fn test_standard_bindings() {
        let classic = InputConfig::standard(false);
        assert!(classic.has_binding(Action::Throttle));
        assert!(classic.has_binding(Action::ToggleCamera));
        assert!(!classic.has_binding(Action::Boost));

        let boosted = InputConfig::standard(true);
        assert_eq!(
            boosted.get_action(InputSource::key(KeyCode::Space)),
            Some(Action::Boost)
        );
        assert_eq!(boosted.get_sources(Action::Boost).len(), 3);
    }
}
