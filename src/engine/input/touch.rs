// On-screen touch layout: steering drag pad, pedal zone and hold buttons

use super::action::Action;
use glam::Vec2;

/// Rectangle in normalized screen coordinates (0..1 on both axes, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Check if a normalized point lies inside the rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// A button that holds its action while a pointer rests on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldButton {
    pub action: Action,
    pub rect: ScreenRect,
}

/// What a pointer is doing for as long as it stays down
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRole {
    /// Steering pad anchored where the pointer went down (pixels)
    Pad { origin: Vec2 },
    /// Holding an on-screen button
    Button(Action),
    /// Analog throttle/brake strip on the right half
    Pedal,
}

/// Geometry of the touch controls
#[derive(Debug, Clone, PartialEq)]
pub struct TouchLayout {
    /// Drag distance in pixels that maps to full steering lock
    pub pad_max_radius: f32,
    /// Fraction of the screen width covered by the steering pad
    pub pad_width: f32,
    /// Height fraction separating the throttle zone (above) from the brake zone (below)
    pub pedal_split: f32,
    /// Height fraction over which throttle ramps from 0 to 1
    pub throttle_span: f32,
    /// Height fraction over which brake ramps from 0 to 1
    pub brake_span: f32,
    /// Hold buttons, checked before the pedal zone
    pub buttons: Vec<HoldButton>,
}

impl TouchLayout {
    /// Pad and pedals only
    pub fn classic() -> Self {
        Self {
            pad_max_radius: 90.0,
            pad_width: 0.5,
            pedal_split: 0.56,
            throttle_span: 0.5,
            brake_span: 0.44,
            buttons: Vec::new(),
        }
    }

    /// Pad and pedals plus a BOOST button in the top-right corner
    pub fn with_boost_button() -> Self {
        Self {
            buttons: vec![HoldButton {
                action: Action::Boost,
                rect: ScreenRect::new(Vec2::new(0.82, 0.04), Vec2::new(0.97, 0.22)),
            }],
            ..Self::classic()
        }
    }

    /// Decide the role of a pointer that just went down at `pos` (pixels)
    pub fn classify(&self, pos: Vec2, screen: Vec2) -> PointerRole {
        if pos.x < screen.x * self.pad_width {
            return PointerRole::Pad { origin: pos };
        }

        let normalized = normalize(pos, screen);
        self.buttons
            .iter()
            .find(|b| b.rect.contains(normalized))
            .map(|b| PointerRole::Button(b.action))
            .unwrap_or(PointerRole::Pedal)
    }

    /// Steering value for a pad dragged from `origin` to `pos`
    pub fn pad_steer(&self, origin: Vec2, pos: Vec2) -> f32 {
        if self.pad_max_radius <= 0.0 {
            return 0.0;
        }
        ((pos.x - origin.x) / self.pad_max_radius).clamp(-1.0, 1.0)
    }

    /// (throttle, brake) for a pedal pointer at `pos`
    pub fn pedal(&self, pos: Vec2, screen: Vec2) -> (f32, f32) {
        let split = screen.y * self.pedal_split;
        if pos.y < split {
            let throttle = (split - pos.y) / (screen.y * self.throttle_span);
            (throttle.clamp(0.0, 1.0), 0.0)
        } else {
            let brake = (pos.y - split) / (screen.y * self.brake_span);
            (0.0, brake.clamp(0.0, 1.0))
        }
    }
}

impl Default for TouchLayout {
    fn default() -> Self {
        Self::classic()
    }
}

fn normalize(pos: Vec2, screen: Vec2) -> Vec2 {
    Vec2::new(
        if screen.x > 0.0 { pos.x / screen.x } else { 0.0 },
        if screen.y > 0.0 { pos.y / screen.y } else { 0.0 },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCREEN: Vec2 = Vec2::new(1000.0, 500.0);

    #[test]
    fn test_left_half_is_pad() {
        let layout = TouchLayout::classic();
        let pos = Vec2::new(200.0, 300.0);
        assert_eq!(layout.classify(pos, SCREEN), PointerRole::Pad { origin: pos });
    }

    #[test]
    fn test_right_half_is_pedal_without_buttons() {
        let layout = TouchLayout::classic();
        assert_eq!(layout.classify(Vec2::new(900.0, 50.0), SCREEN), PointerRole::Pedal);
    }

    #[test]
    fn test_boost_button_hit() {
        let layout = TouchLayout::with_boost_button();
        assert_eq!(
            layout.classify(Vec2::new(900.0, 50.0), SCREEN),
            PointerRole::Button(Action::Boost)
        );
        assert_eq!(layout.classify(Vec2::new(900.0, 400.0), SCREEN), PointerRole::Pedal);
    }

    #[test]
    fn test_pad_steer_normalized_and_clamped() {
        let layout = TouchLayout::classic();
        let origin = Vec2::new(200.0, 300.0);
        assert_relative_eq!(layout.pad_steer(origin, Vec2::new(245.0, 310.0)), 0.5);
        assert_relative_eq!(layout.pad_steer(origin, Vec2::new(155.0, 300.0)), -0.5);
        assert_eq!(layout.pad_steer(origin, Vec2::new(900.0, 0.0)), 1.0);
        assert_eq!(layout.pad_steer(origin, Vec2::new(-500.0, 0.0)), -1.0);
    }

    #[test]
    fn test_pedal_zones() {
        let layout = TouchLayout::classic();

        // Split at y = 280; throttle spans 250 px upward
        let (throttle, brake) = layout.pedal(Vec2::new(800.0, 155.0), SCREEN);
        assert_relative_eq!(throttle, 0.5);
        assert_eq!(brake, 0.0);

        let (throttle, brake) = layout.pedal(Vec2::new(800.0, 0.0), SCREEN);
        assert_relative_eq!(throttle, 1.0);
        assert_eq!(brake, 0.0);

        // Brake spans 220 px downward
        let (throttle, brake) = layout.pedal(Vec2::new(800.0, 390.0), SCREEN);
        assert_eq!(throttle, 0.0);
        assert_relative_eq!(brake, 0.5);

        let (_, brake) = layout.pedal(Vec2::new(800.0, 5000.0), SCREEN);
        assert_eq!(brake, 1.0);
    }
}
