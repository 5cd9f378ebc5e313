/// Frame scheduling and timing
///
/// Drives one variable-length update per display refresh. The time step is
/// clamped so a long stall (minimised window, debugger pause) cannot launch
/// the simulation forward in a single frame. Time comes from an injected
/// `Clock` and the next frame is requested through a `FrameRequester`, which
/// lets tests feed synthetic frame sequences.
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Default upper bound for a single frame's time step (seconds)
pub const DEFAULT_FRAME_CAP: f32 = 0.033;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Source of monotonic time
pub trait Clock {
    /// Time elapsed since some fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests and replays
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move time forward by fractional seconds
    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Capability to schedule the next frame callback
pub trait FrameRequester {
    fn request_frame(&self);
}

impl FrameRequester for winit::window::Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

/// Anything that advances by a time step once per frame
pub trait FrameUpdate {
    fn update(&mut self, dt: f32);
}

/// Per-frame timing state
pub struct FrameScheduler<C: Clock> {
    /// Time source
    clock: C,

    /// Time of the previous frame
    prev: Duration,

    /// Largest time step handed to the simulation
    frame_cap: f32,

    /// Raw frame durations for FPS calculation
    frame_times: Vec<f32>,

    /// Current frame number
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,
}

impl<C: Clock> FrameScheduler<C> {
    /// Create a scheduler; the first frame measures dt from this moment
    pub fn new(clock: C, frame_cap: f32) -> Self {
        let prev = clock.now();
        Self {
            clock,
            prev,
            frame_cap: frame_cap.max(0.0),
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
        }
    }

    /// Sample the clock and return this frame's clamped time step
    pub fn begin_frame(&mut self) -> f32 {
        let now = self.clock.now();
        let raw = now.saturating_sub(self.prev).as_secs_f32();
        self.prev = now;
        self.frame_count += 1;

        self.frame_times.push(raw);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        // Update FPS counter every 10 frames
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        if raw > self.frame_cap {
            log::trace!("Frame took {:.3}s, clamped to {:.3}s", raw, self.frame_cap);
        }

        raw.min(self.frame_cap)
    }

    /// Run one full iteration: step the target, then ask for the next frame
    pub fn run_frame<U, R>(&mut self, target: &mut U, requester: &R) -> f32
    where
        U: FrameUpdate + ?Sized,
        R: FrameRequester + ?Sized,
    {
        let dt = self.begin_frame();
        target.update(dt);
        requester.request_frame();
        dt
    }

    /// Get the frame cap in seconds
    #[allow(dead_code)]
    pub fn frame_cap(&self) -> f32 {
        self.frame_cap
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total number of frames run
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: f32 = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as f32;

        self.current_fps = if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        };
    }
}
