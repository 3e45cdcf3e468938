//! Tweening engine for the slider rectangle and the title decorator.
//!
//! A [`Tween`] moves `K` independent components toward a target using one
//! of two numeric models. Each component carries its own velocity and
//! integral-error term. The tween is advanced by [`Tween::tick`], which
//! only steps once the configured interval has elapsed since the last
//! step.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use libm::{fabsf, fmodf, roundf};

use crate::config::{CONVERGENCE_TOLERANCE, MAX_TICK_DT, SPRING_DAMPING, SPRING_FREQUENCY};

/// Longest slice the spring is integrated over in one go (s). Stalled
/// ticks are split into slices so the explicit integrator stays stable.
const SPRING_MAX_STEP: f32 = 0.02;

/// Numeric model used to approach the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationForm {
    /// Duration-parameterised approach with accumulated-error correction.
    Integral,
    /// Underdamped spring-mass-damper (ζ = 0.5, ωn = 15 rad/s).
    Spring,
}

/// Timing and model shared by every tween of a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Motion {
    pub form: AnimationForm,
    pub duration_ms: u16,
    pub interval_ms: u16,
}

impl Motion {
    /// Nominal number of steps across the duration.
    fn steps(&self) -> f32 {
        self.duration_ms as f32 / self.interval_ms.max(1) as f32
    }

    fn interval_s(&self) -> f32 {
        self.interval_ms as f32 / 1000.0
    }
}

/// Outcome of one [`Tween::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// Not animating.
    Idle,
    /// Interval not yet elapsed; nothing changed.
    Waiting,
    /// Stepped; still short of the target.
    Running,
    /// Stepped and every component reached its target.
    Finished,
}

impl Progress {
    pub fn stepped(self) -> bool {
        matches!(self, Progress::Running | Progress::Finished)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Channel {
    current: f32,
    target: f32,
    velocity: f32,
    error: f32,
}

impl Channel {
    fn at(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            velocity: 0.0,
            error: 0.0,
        }
    }

    fn settle_if_close(&mut self) -> bool {
        if fabsf(self.current - self.target) < CONVERGENCE_TOLERANCE {
            self.current = self.target;
            self.velocity = 0.0;
            self.error = 0.0;
            true
        } else {
            false
        }
    }

    /// Advance by `dt` seconds. Returns `true` once converged.
    fn advance(&mut self, dt: f32, motion: &Motion) -> bool {
        match motion.form {
            AnimationForm::Integral => {
                if self.settle_if_close() {
                    return true;
                }
                let steps = motion.steps();
                self.current += (self.target - self.current) / steps;
                self.error += self.target - self.current;
                self.current += self.error / steps;
                self.error = fmodf(self.error, steps);
                false
            }
            AnimationForm::Spring => {
                if dt <= 0.0 {
                    return false;
                }
                let slices = libm::ceilf(dt / SPRING_MAX_STEP).max(1.0);
                let h = dt / slices;
                for _ in 0..slices as u32 {
                    if self.settle_if_close() {
                        return true;
                    }
                    let displacement = self.current - self.target;
                    let accel = -2.0 * SPRING_DAMPING * SPRING_FREQUENCY * self.velocity
                        - SPRING_FREQUENCY * SPRING_FREQUENCY * displacement;
                    self.velocity += accel * h;
                    self.current += self.velocity * h;
                }
                false
            }
        }
    }
}

/// `K` tweened components sharing one activity flag and clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<const K: usize> {
    channels: [Channel; K],
    active: bool,
    last_ms: u64,
}

impl<const K: usize> Tween<K> {
    /// A resting tween at `values`.
    pub fn new(values: [f32; K]) -> Self {
        Self {
            channels: values.map(Channel::at),
            active: false,
            last_ms: 0,
        }
    }

    /// Retarget from wherever the components currently are.
    ///
    /// An in-flight animation keeps its position and velocity; only the
    /// destination changes.
    pub fn arm(&mut self, target: [f32; K], now_ms: u64) {
        for (ch, t) in self.channels.iter_mut().zip(target) {
            ch.target = t;
        }
        self.active = true;
        self.last_ms = now_ms;
    }

    /// Restart from `start` with zero velocity and error, heading to `target`.
    pub fn launch(&mut self, start: [f32; K], target: [f32; K], now_ms: u64) {
        for ((ch, s), t) in self.channels.iter_mut().zip(start).zip(target) {
            *ch = Channel {
                current: s,
                target: t,
                velocity: 0.0,
                error: 0.0,
            };
        }
        self.active = true;
        self.last_ms = now_ms;
    }

    /// Jump straight to `value` and stop.
    pub fn snap(&mut self, value: [f32; K]) {
        for (ch, v) in self.channels.iter_mut().zip(value) {
            *ch = Channel::at(v);
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current(&self) -> [f32; K] {
        self.channels.map(|c| c.current)
    }

    pub fn target(&self) -> [f32; K] {
        self.channels.map(|c| c.target)
    }

    /// Step every component by `dt` seconds. Returns `true` when all of
    /// them have converged; the tween then goes inactive.
    pub fn advance(&mut self, dt: f32, motion: &Motion) -> bool {
        let mut done = true;
        for ch in self.channels.iter_mut() {
            done &= ch.advance(dt, motion);
        }
        if done {
            self.active = false;
        }
        done
    }

    /// Step once if at least one interval has elapsed since the last step.
    pub fn tick(&mut self, now_ms: u64, motion: &Motion) -> Progress {
        if !self.active {
            return Progress::Idle;
        }
        let elapsed = now_ms.saturating_sub(self.last_ms);
        if elapsed < motion.interval_ms as u64 {
            return Progress::Waiting;
        }
        let mut dt = (elapsed as f32 / 1000.0).min(MAX_TICK_DT);
        if dt <= 0.0 {
            dt = motion.interval_s();
        }
        self.last_ms = now_ms;

        if self.advance(dt, motion) {
            Progress::Finished
        } else {
            Progress::Running
        }
    }
}

/// Rectangle as the four components of a `Tween<4>`.
pub fn rect_components(rect: Rectangle) -> [f32; 4] {
    [
        rect.top_left.x as f32,
        rect.top_left.y as f32,
        rect.size.width as f32,
        rect.size.height as f32,
    ]
}

/// Pixel rectangle nearest to the four components.
pub fn components_rect(c: [f32; 4]) -> Rectangle {
    Rectangle::new(
        Point::new(roundf(c[0]) as i32, roundf(c[1]) as i32),
        Size::new(
            roundf(c[2]).max(0.0) as u32,
            roundf(c[3]).max(0.0) as u32,
        ),
    )
}

impl Tween<4> {
    pub fn rect(&self) -> Rectangle {
        components_rect(self.current())
    }

    pub fn target_rect(&self) -> Rectangle {
        components_rect(self.target())
    }
}

impl Tween<1> {
    /// Current value rounded to whole pixels.
    pub fn pixel(&self) -> i32 {
        roundf(self.channels[0].current) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTEGRAL: Motion = Motion {
        form: AnimationForm::Integral,
        duration_ms: 200,
        interval_ms: 15,
    };

    const SPRING: Motion = Motion {
        form: AnimationForm::Spring,
        duration_ms: 200,
        interval_ms: 15,
    };

    fn run_to_rest(tween: &mut Tween<4>, motion: &Motion) -> usize {
        let mut now = 0;
        for n in 1..=500 {
            now += motion.interval_ms as u64;
            if tween.tick(now, motion) == Progress::Finished {
                return n;
            }
        }
        panic!("tween never settled");
    }

    #[test]
    fn integral_reaches_target_exactly() {
        let mut t = Tween::new([0.0, 36.0, 72.0, 16.0]);
        t.arm([0.0, 57.0, 130.0, 16.0], 0);
        let n = run_to_rest(&mut t, &INTEGRAL);
        assert!(n < 60);
        assert_eq!(t.current(), [0.0, 57.0, 130.0, 16.0]);
        assert!(!t.is_active());
    }

    #[test]
    fn spring_reaches_target_exactly() {
        let mut t = Tween::new([0.0, 36.0, 72.0, 16.0]);
        t.arm([12.0, 37.0, 216.0, 75.0], 0);
        let n = run_to_rest(&mut t, &SPRING);
        assert!(n < 100);
        assert_eq!(t.target_rect(), t.rect());
        assert_eq!(t.rect(), Rectangle::new(Point::new(12, 37), Size::new(216, 75)));
    }

    #[test]
    fn integral_distance_shrinks() {
        let mut t = Tween::new([0.0]);
        t.arm([100.0], 0);
        let mut last = 100.0;
        let mut now = 0;
        for _ in 0..10 {
            now += 15;
            t.tick(now, &INTEGRAL);
            let d = fabsf(100.0 - t.current()[0]);
            assert!(d < last);
            last = d;
        }
    }

    #[test]
    fn spring_ignores_non_positive_dt() {
        let mut t = Tween::new([0.0]);
        t.arm([100.0], 0);
        assert!(!t.advance(0.0, &SPRING));
        assert!(!t.advance(-0.5, &SPRING));
        assert_eq!(t.current(), [0.0]);
        assert!(t.is_active());
    }

    #[test]
    fn spring_survives_a_stalled_tick() {
        let mut t = Tween::new([0.0]);
        t.arm([100.0], 0);
        // A one-second stall is clamped to 100 ms and split into slices.
        assert_eq!(t.tick(1000, &SPRING), Progress::Running);
        let x = t.current()[0];
        assert!(x > 0.0 && x < 200.0);
        let mut now = 1000;
        while t.is_active() {
            now += 15;
            t.tick(now, &SPRING);
            assert!(now < 10_000);
        }
        assert_eq!(t.current(), [100.0]);
    }

    #[test]
    fn tick_waits_for_interval() {
        let mut t = Tween::new([0.0]);
        t.arm([50.0], 100);
        assert_eq!(t.tick(110, &INTEGRAL), Progress::Waiting);
        assert_eq!(t.current(), [0.0]);
        assert_eq!(t.tick(115, &INTEGRAL), Progress::Running);
        assert!(t.current()[0] > 0.0);
    }

    #[test]
    fn idle_tween_reports_idle() {
        let mut t = Tween::new([3.0]);
        assert_eq!(t.tick(1_000, &INTEGRAL), Progress::Idle);
    }

    #[test]
    fn close_enough_snaps() {
        let mut t = Tween::new([10.0]);
        t.arm([10.4], 0);
        assert_eq!(t.tick(15, &SPRING), Progress::Finished);
        assert_eq!(t.current(), [10.4]);
    }

    #[test]
    fn rearm_keeps_position() {
        let mut t = Tween::new([0.0]);
        t.arm([100.0], 0);
        t.tick(15, &INTEGRAL);
        let mid = t.current()[0];
        t.arm([-50.0], 15);
        assert_eq!(t.current()[0], mid);
        assert_eq!(t.target(), [-50.0]);
    }

    #[test]
    fn launch_resets_start() {
        let mut t = Tween::new([3.0]);
        t.launch([240.0], [3.0], 0);
        assert_eq!(t.pixel(), 240);
        assert!(t.is_active());
    }

    #[test]
    fn snap_stops_motion() {
        let mut t = Tween::new([0.0, 0.0, 0.0, 0.0]);
        t.arm([5.0, 6.0, 7.0, 8.0], 0);
        t.snap([1.0, 2.0, 3.0, 4.0]);
        assert!(!t.is_active());
        assert_eq!(t.current(), t.target());
    }
}
