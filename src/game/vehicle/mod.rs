// Vehicle integrator
//
// Advances the car once per frame from the control vector:
// - `tuning`: presets for the classic and boost builds
// - `state`: the kinematic state it mutates

pub mod state;
pub mod tuning;

pub use state::VehicleState;
pub use tuning::{BoostMode, DriveLimits, VehicleTuning};

use crate::core::math::{damp, move_towards};
use crate::engine::input::ControlVector;
use glam::Vec2;

/// Move a ground position along `heading` at `speed` for `dt` seconds
pub fn advance_position(position: Vec2, heading: f32, speed: f32, dt: f32) -> Vec2 {
    position + Vec2::new(heading.sin(), heading.cos()) * speed * dt
}

/// The player's car
#[derive(Debug, Clone)]
pub struct Vehicle {
    state: VehicleState,
    tuning: VehicleTuning,
    /// Speed as shown to the player, refreshed every step
    display_speed: u32,
}

impl Vehicle {
    /// A car at rest in the middle of the arena
    pub fn new(tuning: VehicleTuning) -> Self {
        Self::with_state(tuning, VehicleState::default())
    }

    /// A car starting from an arbitrary state
    pub fn with_state(tuning: VehicleTuning, state: VehicleState) -> Self {
        let mut vehicle = Self {
            state,
            tuning,
            display_speed: 0,
        };
        vehicle.refresh_display_speed();
        vehicle
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Rounded speed for the HUD
    pub fn display_speed(&self) -> u32 {
        self.display_speed
    }

    /// Advance the car by `dt` seconds. Never fails; negative dt is treated as 0.
    pub fn step(&mut self, dt: f32, control: ControlVector) {
        let dt = dt.max(0.0);
        let tuning = &self.tuning;
        let state = &mut self.state;

        state.smoothed_steer = damp(
            state.smoothed_steer,
            control.steer,
            tuning.steer_smoothing,
            dt,
        );

        let limits = tuning.limits(control.boost);

        // Brake and drag apply even without throttle, so the car coasts to a stop
        state.speed += control.throttle * limits.acceleration * dt;
        state.speed -= control.brake * tuning.brake_deceleration * dt;
        state.speed -= limits.drag * dt;
        state.speed = state.speed.clamp(0.0, limits.max_speed);

        let speed_fraction = state.speed / limits.max_speed;
        state.heading -=
            state.smoothed_steer * (0.5 + speed_fraction) * dt * limits.turn_rate;

        // Hard positional clamp: speed and heading are left alone at the wall
        let bound = tuning.arena_bound();
        state.position = advance_position(state.position, state.heading, state.speed, dt)
            .clamp(Vec2::splat(-bound), Vec2::splat(bound));

        let boosting = match tuning.boost_mode {
            BoostMode::SpeedGated {
                speed_fraction,
                throttle,
            } => {
                state.speed > tuning.normal.max_speed * speed_fraction
                    && control.throttle > throttle
            }
            BoostMode::Button => control.boost,
        };
        state.boost_intensity = if boosting {
            move_towards(state.boost_intensity, 1.0, dt * tuning.boost_rise_rate)
        } else {
            move_towards(state.boost_intensity, 0.0, dt * tuning.boost_decay_rate)
        };

        self.refresh_display_speed();
        log::trace!(
            "vehicle speed={:.1} heading={:.3} pos=({:.1}, {:.1}) boost={:.2}",
            self.state.speed,
            self.state.heading,
            self.state.position.x,
            self.state.position.y,
            self.state.boost_intensity
        );
    }

    fn refresh_display_speed(&mut self) {
        self.display_speed = (self.state.speed * self.tuning.display_speed_factor).round() as u32;
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new(VehicleTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn control(steer: f32, throttle: f32, brake: f32, boost: bool) -> ControlVector {
        ControlVector::new(steer, throttle, brake, boost)
    }

    fn at_speed(tuning: VehicleTuning, speed: f32) -> Vehicle {
        Vehicle::with_state(
            tuning,
            VehicleState {
                speed,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_full_throttle_for_one_second() {
        let mut vehicle = Vehicle::new(VehicleTuning::classic());
        let full = control(0.0, 1.0, 0.0, false);

        let mut expected = 0.0f32;
        for _ in 0..60 {
            vehicle.step(DT, full);
            expected = (expected + 260.0 / 60.0 - 22.0 / 60.0).clamp(0.0, 380.0);
            assert!(vehicle.state().speed <= 380.0);
        }

        assert_relative_eq!(vehicle.state().speed, expected, epsilon = 1e-3);
        assert_relative_eq!(vehicle.state().speed, 238.0, epsilon = 1e-2);
    }

    #[test]
    fn test_coasting_from_top_speed() {
        let mut vehicle = at_speed(VehicleTuning::classic(), 380.0);
        vehicle.step(DT, ControlVector::NEUTRAL);
        assert_relative_eq!(vehicle.state().speed, 380.0 - 22.0 / 60.0, epsilon = 1e-3);
        assert_relative_eq!(vehicle.state().speed, 379.633, epsilon = 1e-3);
    }

    #[test]
    fn test_advance_position_straight_ahead() {
        let moved = advance_position(Vec2::ZERO, 0.0, 100.0, 1.0);
        assert_relative_eq!(moved.x, 0.0);
        assert_relative_eq!(moved.y, 100.0);
    }

    #[test]
    fn test_speed_stays_in_range() {
        let dts = [0.0, 0.001, DT, 0.033, 0.5, 3.0];
        let controls = [
            control(0.0, 1.0, 0.0, false),
            control(1.0, 1.0, 0.0, true),
            control(-1.0, 0.0, 1.0, false),
            control(0.3, 0.5, 0.5, true),
            ControlVector::NEUTRAL,
        ];

        for tuning in [VehicleTuning::classic(), VehicleTuning::boost()] {
            let mut vehicle = Vehicle::new(tuning);
            for (i, dt) in dts.iter().cycle().take(300).enumerate() {
                let c = controls[i % controls.len()];
                vehicle.step(*dt, c);
                let max = vehicle.tuning().limits(c.boost).max_speed;
                let speed = vehicle.state().speed;
                assert!((0.0..=max).contains(&speed), "speed {speed} outside [0, {max}]");
            }
        }
    }

    #[test]
    fn test_neutral_input_coasts_to_stop() {
        let mut vehicle = at_speed(VehicleTuning::classic(), 300.0);
        let mut previous = vehicle.state().speed;

        for _ in 0..2000 {
            vehicle.step(DT, ControlVector::NEUTRAL);
            let speed = vehicle.state().speed;
            assert!(speed <= previous);
            assert!(speed >= 0.0);
            previous = speed;
        }

        assert_eq!(vehicle.state().speed, 0.0);
        vehicle.step(DT, ControlVector::NEUTRAL);
        assert_eq!(vehicle.state().speed, 0.0);
    }

    #[test]
    fn test_brake_without_throttle_stops_quickly() {
        let mut vehicle = at_speed(VehicleTuning::classic(), 100.0);
        for _ in 0..20 {
            vehicle.step(DT, control(0.0, 0.0, 1.0, false));
        }
        assert_eq!(vehicle.state().speed, 0.0);
    }

    #[test]
    fn test_position_clamped_at_arena_edge() {
        let tuning = VehicleTuning::classic();
        let bound = tuning.arena_bound();
        let mut vehicle = Vehicle::with_state(
            tuning,
            VehicleState {
                position: Vec2::new(0.0, bound - 5.0),
                speed: 300.0,
                ..Default::default()
            },
        );

        for _ in 0..600 {
            vehicle.step(DT, control(0.0, 1.0, 0.0, false));
            let p = vehicle.state().position;
            assert!(p.x.abs() <= bound && p.y.abs() <= bound);
        }

        let state = vehicle.state();
        assert_eq!(state.position.y, bound);
        // Wall does not touch speed or heading
        assert_eq!(state.speed, 380.0);
        assert_eq!(state.heading, 0.0);
    }

    #[test]
    fn test_position_clamped_on_both_axes() {
        let tuning = VehicleTuning::boost();
        let bound = tuning.arena_bound();
        let mut vehicle = Vehicle::with_state(
            tuning,
            VehicleState {
                heading: -3.0 * std::f32::consts::FRAC_PI_4,
                speed: 500.0,
                ..Default::default()
            },
        );

        for _ in 0..2000 {
            vehicle.step(DT, control(0.0, 1.0, 0.0, true));
        }

        assert_eq!(vehicle.state().position, Vec2::splat(-bound));
        assert!(vehicle.state().speed > 0.0);
    }

    #[test]
    fn test_steer_smoothing_converges_monotonically() {
        for tuning in [VehicleTuning::classic(), VehicleTuning::boost()] {
            let mut vehicle = Vehicle::new(tuning);
            let hold = control(0.75, 0.0, 0.0, false);
            let mut previous = vehicle.state().smoothed_steer;

            for _ in 0..120 {
                vehicle.step(DT, hold);
                let steer = vehicle.state().smoothed_steer;
                assert!(steer >= previous);
                assert!(steer <= 0.75);
                previous = steer;
            }

            assert_relative_eq!(vehicle.state().smoothed_steer, 0.75, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_steer_never_jumps_in_one_frame() {
        let mut vehicle = Vehicle::new(VehicleTuning::classic());
        vehicle.step(DT, control(1.0, 0.0, 0.0, false));
        assert_relative_eq!(vehicle.state().smoothed_steer, 8.0 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_boost_accelerates_harder_and_goes_faster() {
        let tuning = VehicleTuning::boost();
        let mut plain = Vehicle::new(tuning.clone());
        let mut boosted = Vehicle::new(tuning);

        plain.step(DT, control(0.0, 1.0, 0.0, false));
        boosted.step(DT, control(0.0, 1.0, 0.0, true));
        assert!(boosted.state().speed > plain.state().speed);

        for _ in 0..600 {
            plain.step(DT, control(0.0, 1.0, 0.0, false));
            boosted.step(DT, control(0.0, 1.0, 0.0, true));
        }
        assert_eq!(plain.state().speed, 380.0);
        assert_eq!(boosted.state().speed, 520.0);
    }

    #[test]
    fn test_turn_rate_scales_with_speed() {
        let tuning = VehicleTuning::classic();
        let steady = VehicleState {
            smoothed_steer: 1.0,
            ..Default::default()
        };

        let mut slow = Vehicle::with_state(tuning.clone(), VehicleState { speed: 10.0, ..steady });
        let mut fast = Vehicle::with_state(tuning, VehicleState { speed: 300.0, ..steady });
        slow.step(DT, control(1.0, 0.0, 0.0, false));
        fast.step(DT, control(1.0, 0.0, 0.0, false));

        // Positive steer turns toward negative heading
        assert!(slow.state().heading < 0.0);
        assert!(fast.state().heading < slow.state().heading);
    }

    #[test]
    fn test_button_boost_intensity_ramps() {
        let mut vehicle = Vehicle::new(VehicleTuning::boost());
        vehicle.step(0.1, control(0.0, 0.0, 0.0, true));
        assert_relative_eq!(vehicle.state().boost_intensity, 0.6, epsilon = 1e-5);

        vehicle.step(0.1, control(0.0, 0.0, 0.0, true));
        assert_eq!(vehicle.state().boost_intensity, 1.0);

        vehicle.step(0.1, ControlVector::NEUTRAL);
        assert_relative_eq!(vehicle.state().boost_intensity, 0.65, epsilon = 1e-5);

        for _ in 0..10 {
            vehicle.step(0.1, ControlVector::NEUTRAL);
        }
        assert_eq!(vehicle.state().boost_intensity, 0.0);
    }

    #[test]
    fn test_gated_boost_needs_speed_and_throttle() {
        let tuning = VehicleTuning::classic();

        // Throttle but slow: no boost, even with the boost control held
        let mut slow = at_speed(tuning.clone(), 100.0);
        slow.step(DT, control(0.0, 1.0, 0.0, true));
        assert_eq!(slow.state().boost_intensity, 0.0);

        // Fast but coasting: no boost
        let mut coasting = at_speed(tuning.clone(), 370.0);
        coasting.step(DT, ControlVector::NEUTRAL);
        assert_eq!(coasting.state().boost_intensity, 0.0);

        // Fast and flooring it
        let mut flooring = at_speed(tuning, 370.0);
        flooring.step(DT, control(0.0, 1.0, 0.0, false));
        assert_relative_eq!(flooring.state().boost_intensity, 4.0 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_display_speed() {
        let mut vehicle = at_speed(VehicleTuning::classic(), 100.0);
        assert_eq!(vehicle.display_speed(), 135);

        vehicle.step(DT, ControlVector::NEUTRAL);
        let expected = (vehicle.state().speed * 1.35).round() as u32;
        assert_eq!(vehicle.display_speed(), expected);
    }

    #[test]
    fn test_zero_and_negative_dt_change_nothing() {
        let start = VehicleState {
            position: Vec2::new(10.0, 20.0),
            heading: 0.4,
            speed: 120.0,
            smoothed_steer: 0.2,
            boost_intensity: 0.5,
        };
        for dt in [0.0, -1.0] {
            let mut vehicle = Vehicle::with_state(VehicleTuning::boost(), start);
            vehicle.step(dt, control(1.0, 1.0, 0.0, true));
            assert_eq!(*vehicle.state(), start);
        }
    }
}
