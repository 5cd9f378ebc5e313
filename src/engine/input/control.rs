// Normalized driving controls shared by every input source

/// The single control vector the vehicle reads each frame.
///
/// Every field is already clamped to its valid range by whoever wrote it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlVector {
    /// Steering in [-1, 1] (negative = left)
    pub steer: f32,
    /// Throttle in [0, 1]
    pub throttle: f32,
    /// Brake in [0, 1]
    pub brake: f32,
    /// Whether the boost control is held
    pub boost: bool,
}

impl ControlVector {
    /// All axes at rest
    pub const NEUTRAL: Self = Self {
        steer: 0.0,
        throttle: 0.0,
        brake: 0.0,
        boost: false,
    };

    /// Build a control vector, clamping every axis into range
    pub fn new(steer: f32, throttle: f32, brake: f32, boost: bool) -> Self {
        Self {
            steer: steer.clamp(-1.0, 1.0),
            throttle: throttle.clamp(0.0, 1.0),
            brake: brake.clamp(0.0, 1.0),
            boost,
        }
    }

    #[allow(dead_code)]
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        assert!(ControlVector::default().is_neutral());
    }

    #[test]
    fn test_new_clamps_axes() {
        let control = ControlVector::new(-3.0, 1.5, -0.2, true);
        assert_eq!(control.steer, -1.0);
        assert_eq!(control.throttle, 1.0);
        assert_eq!(control.brake, 0.0);
        assert!(control.boost);
    }
}
