//! Timer state shared by fishing and regulation towers.
//!
//! A tower fires once per effect interval. Each firing may start an attempt
//! against a target, and that attempt resolves over one full interval while
//! the countdown to the next firing keeps running. A hit is shown as
//! `2 × flashes` equal half-intervals, a miss as a single quiet segment, so
//! the firing rate does not depend on the odds.

use serde::{Deserialize, Serialize};

const TIME_EPSILON: f32 = 1e-4;

/// Countdown to a tower's next firing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerLoop {
    interval: f32,
    countdown: f32,
}

impl TowerLoop {
    /// Creates a loop that first fires after one full interval.
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            countdown: interval,
        }
    }

    /// Seconds between firings.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Seconds until the next firing.
    pub fn remaining(&self) -> f32 {
        self.countdown.max(0.0)
    }

    /// Advances the countdown.
    ///
    /// # Returns
    ///
    /// `true` when the interval elapsed during this step. The countdown then
    /// restarts from a full interval; overshoot is dropped.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.countdown -= dt;
        if self.countdown <= TIME_EPSILON {
            self.countdown = self.interval;
            true
        } else {
            false
        }
    }

    /// Restarts the countdown from a full interval.
    pub fn reset(&mut self) {
        self.countdown = self.interval;
    }
}

/// One resolving attempt of a tower against a target.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchAttempt<T> {
    /// What the attempt is aimed at.
    pub target: T,
    /// Whether the roll succeeded.
    pub success: bool,
    elapsed: f32,
    duration: f32,
    flashes: u32,
}

impl<T> CatchAttempt<T> {
    /// Starts an attempt.
    ///
    /// # Arguments
    ///
    /// * `target` - Fish or tower the attempt resolves against
    /// * `success` - Outcome of the roll
    /// * `duration` - Total length of the attempt in seconds
    /// * `flashes` - Number of on/off flash cycles shown on success
    pub fn new(target: T, success: bool, duration: f32, flashes: u32) -> Self {
        Self {
            target,
            success,
            elapsed: 0.0,
            duration,
            flashes: flashes.max(1),
        }
    }

    /// Number of equal segments the attempt is split into.
    pub fn segment_count(&self) -> u32 {
        if self.success { 2 * self.flashes } else { 1 }
    }

    /// Length of one segment in seconds.
    pub fn segment_length(&self) -> f32 {
        self.duration / self.segment_count() as f32
    }

    /// Sum of all segment lengths.
    pub fn total_duration(&self) -> f32 {
        self.segment_length() * self.segment_count() as f32
    }

    /// Seconds spent on the attempt so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Returns true while the highlight should be drawn.
    ///
    /// Only hits flash; the first half-interval of each cycle is lit.
    pub fn flash_visible(&self) -> bool {
        if !self.success {
            return false;
        }
        let segment = (self.elapsed / self.segment_length()) as u32;
        segment % 2 == 0
    }

    /// Advances the attempt.
    ///
    /// # Returns
    ///
    /// `true` once the full duration has elapsed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.is_complete()
    }

    /// Returns true once the full duration has elapsed.
    pub fn is_complete(&self) -> bool {
        self.elapsed + TIME_EPSILON >= self.total_duration()
    }
}

/// What a tower's timers did during one step.
///
/// Both fields can be set at once; the completed attempt is handled before
/// the new firing.
#[derive(Debug, Clone, PartialEq)]
pub struct TowerTick<T> {
    /// Attempt that finished during this step.
    pub completed: Option<CatchAttempt<T>>,
    /// The interval elapsed; the tower should look for a target now.
    pub fire: bool,
}

impl<T> TowerTick<T> {
    /// Returns true if nothing happened.
    pub fn is_idle(&self) -> bool {
        self.completed.is_none() && !self.fire
    }
}

/// Firing loop plus the attempt in flight.
#[derive(Debug, Clone)]
pub struct TowerCycle<T> {
    timer: TowerLoop,
    attempt: Option<CatchAttempt<T>>,
    flashes: u32,
}

impl<T> TowerCycle<T> {
    /// Creates an idle cycle.
    pub fn new(interval: f32, flashes: u32) -> Self {
        Self {
            timer: TowerLoop::new(interval),
            attempt: None,
            flashes,
        }
    }

    /// The firing countdown.
    pub fn timer(&self) -> &TowerLoop {
        &self.timer
    }

    /// The attempt in flight, if any.
    pub fn attempt(&self) -> Option<&CatchAttempt<T>> {
        self.attempt.as_ref()
    }

    /// Returns true while an attempt is resolving.
    pub fn is_busy(&self) -> bool {
        self.attempt.is_some()
    }

    /// Advances the attempt in flight and the firing countdown.
    ///
    /// The countdown only runs while the tower is active. An attempt never
    /// outlives the interval it started in, so one that is still open when
    /// the tower fires again is completed on that step.
    pub fn tick(&mut self, dt: f32, active: bool) -> TowerTick<T> {
        let finished = self
            .attempt
            .as_mut()
            .is_some_and(|attempt| attempt.advance(dt));
        let fire = active && self.timer.advance(dt);

        let completed = if finished || (fire && self.attempt.is_some()) {
            self.attempt.take()
        } else {
            None
        };
        TowerTick { completed, fire }
    }

    /// Starts an attempt lasting one full interval.
    pub fn begin(&mut self, target: T, success: bool) {
        self.attempt = Some(CatchAttempt::new(
            target,
            success,
            self.timer.interval(),
            self.flashes,
        ));
    }

    /// Drops the attempt in flight and restarts the countdown.
    pub fn cancel(&mut self) -> Option<CatchAttempt<T>> {
        self.timer.reset();
        self.attempt.take()
    }
}
