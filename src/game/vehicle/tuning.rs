// Vehicle tuning presets
//
// Two builds of the car exist: the classic one, where boost is only a
// cosmetic state earned by flooring it near top speed, and the boost one,
// where a held boost control drives it directly.

/// How the boost intensity is driven
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoostMode {
    /// Rises while speed is above `speed_fraction` of max and throttle above `throttle`
    SpeedGated { speed_fraction: f32, throttle: f32 },
    /// Rises while the boost control is held
    Button,
}

/// Movement limits in effect for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveLimits {
    /// Speed cap (units/second)
    pub max_speed: f32,
    /// Acceleration at full throttle (units/second²)
    pub acceleration: f32,
    /// Passive deceleration applied every frame (units/second²)
    pub drag: f32,
    /// Turn rate multiplier (radians/second at full lock)
    pub turn_rate: f32,
}

/// Tunable numbers for the vehicle integrator
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTuning {
    /// Steering low-pass rate (1/s)
    pub steer_smoothing: f32,
    /// Limits without boost
    pub normal: DriveLimits,
    /// Limits while the boost control is held
    pub boosted: DriveLimits,
    /// Deceleration at full brake (units/second²)
    pub brake_deceleration: f32,
    /// How boost intensity is driven
    pub boost_mode: BoostMode,
    /// Boost intensity rise rate (1/s)
    pub boost_rise_rate: f32,
    /// Boost intensity decay rate (1/s)
    pub boost_decay_rate: f32,
    /// Side length of the square arena
    pub world_size: f32,
    /// Distance kept from the arena edge
    pub arena_margin: f32,
    /// Multiplier from internal speed to the displayed number
    pub display_speed_factor: f32,
}

const NORMAL_LIMITS: DriveLimits = DriveLimits {
    max_speed: 380.0,
    acceleration: 260.0,
    drag: 22.0,
    turn_rate: 2.2,
};

const BOOSTED_LIMITS: DriveLimits = DriveLimits {
    max_speed: 520.0,
    acceleration: 340.0,
    drag: 14.0,
    turn_rate: 2.6,
};

/// Boost is a reward for holding full throttle near top speed
pub const CLASSIC_TUNING: VehicleTuning = VehicleTuning {
    steer_smoothing: 8.0,
    normal: NORMAL_LIMITS,
    boosted: BOOSTED_LIMITS,
    brake_deceleration: 360.0,
    boost_mode: BoostMode::SpeedGated {
        speed_fraction: 0.82,
        throttle: 0.7,
    },
    boost_rise_rate: 4.0,
    boost_decay_rate: 2.6,
    world_size: 2400.0,
    arena_margin: 40.0,
    display_speed_factor: 1.35,
};

/// Boost is a held control
pub const BOOST_TUNING: VehicleTuning = VehicleTuning {
    steer_smoothing: 9.0,
    boost_mode: BoostMode::Button,
    boost_rise_rate: 6.0,
    boost_decay_rate: 3.5,
    ..CLASSIC_TUNING
};

impl VehicleTuning {
    pub fn classic() -> Self {
        CLASSIC_TUNING
    }

    pub fn boost() -> Self {
        BOOST_TUNING
    }

    /// Limits for this frame
    pub fn limits(&self, boost: bool) -> DriveLimits {
        if boost {
            self.boosted
        } else {
            self.normal
        }
    }

    /// Half-extent of the drivable square
    pub fn arena_bound(&self) -> f32 {
        (self.world_size / 2.0 - self.arena_margin).max(0.0)
    }
}

impl Default for VehicleTuning {
    fn default() -> Self {
        BOOST_TUNING
    }
}
