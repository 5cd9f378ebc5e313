// Input handling system
//
// Keyboard, touch and mouse events are reduced to a single `ControlVector`.
//
// ## Architecture
//
// - `action`: Driving actions, one-shot commands and default key bindings
// - `config`: Key binding configuration and remapping
// - `control`: The normalized control vector
// - `touch`: Touch layout (steering pad, pedal strip, hold buttons)
// - `aggregator`: Folds every source into the control vector
//
// ## Usage Example
//
// ```rust
// use engine::input::{ControlAggregator, InputConfig, TouchLayout};
//
// let mut controls = ControlAggregator::new(InputConfig::standard(true), TouchLayout::with_boost_button());
//
// // In your event loop
// if let Some(command) = controls.process_keyboard_event(&key_event) {
//     session.handle_command(command);
// }
//
// // Once per frame
// vehicle.step(dt, controls.control());
// ```

pub mod action;
pub mod aggregator;
pub mod config;
pub mod control;
pub mod touch;

// Re-export commonly used types
pub use action::{Action, Command, InputSource};
pub use aggregator::ControlAggregator;
pub use config::InputConfig;
pub use control::ControlVector;
pub use touch::TouchLayout;
