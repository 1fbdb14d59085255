//! Fortune meter: a bounded combo resource that turns into a timed burst when full.
//!
//! The meter is the only authority on burst state. Collision handling, the avatar
//! visuals and the HUD all read it synchronously instead of keeping their own copy.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::config::FortuneConfig;
use crate::events::{BurstEvent, BurstSink, EndReason};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Bursting { elapsed: Duration },
}

/// Read-only snapshot of the meter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FortuneState {
    pub fortune: f32,
    pub is_bursting: bool,
    pub burst_elapsed: Duration,
}

pub struct FortuneMeter<S: BurstSink = ()> {
    config: FortuneConfig,
    fortune: f32,
    phase: Phase,
    sink: S,
}

impl FortuneMeter<()> {
    /// Meter without observers.
    pub fn detached(config: FortuneConfig) -> Self {
        Self::new(config, ())
    }
}

impl<S: BurstSink> FortuneMeter<S> {
    /// Settings the meter cannot run on are pulled back into range: an unusable
    /// maximum falls back to the default, a zero-length burst lasts one
    /// millisecond and the floor is clamped to `[0, 1]`.
    pub fn new(mut config: FortuneConfig, sink: S) -> Self {
        if !(config.max_fortune > 0.0 && config.max_fortune.is_finite()) {
            warn!("max_fortune {} unusable; using default", config.max_fortune);
            config.max_fortune = FortuneConfig::default().max_fortune;
        }
        config.burst_duration_ms = config.burst_duration_ms.max(1);
        config.safety_floor = if config.safety_floor.is_nan() {
            0.0
        } else {
            config.safety_floor.clamp(0.0, 1.0)
        };
        Self {
            config,
            fortune: 0.0,
            phase: Phase::Idle,
            sink,
        }
    }

    /// Adds (or with a negative amount, removes) fortune.
    ///
    /// Ignored while bursting. `f32::NEG_INFINITY` drains the meter outright.
    /// Reaching the maximum starts a burst.
    pub fn add_fortune(&mut self, amount: f32) {
        if self.is_bursting() {
            trace!("add_fortune({amount}) ignored while bursting");
            return;
        }
        if amount == f32::NEG_INFINITY {
            debug!("fortune drained from {}", self.fortune);
            self.fortune = 0.0;
            return;
        }
        if amount.is_nan() {
            warn!("add_fortune ignored a NaN amount");
            return;
        }

        let max = self.config.max_fortune;
        self.fortune = (self.fortune + amount).clamp(0.0, max);
        if self.fortune >= max {
            self.start_burst();
        }
    }

    /// Empties the meter; same as `add_fortune(f32::NEG_INFINITY)`.
    pub fn drain(&mut self) {
        self.add_fortune(f32::NEG_INFINITY);
    }

    /// Hit without invincibility: cancels any burst and zeroes fortune.
    pub fn reset_fortune(&mut self) {
        let was_bursting = self.is_bursting();
        self.phase = Phase::Idle;
        self.fortune = 0.0;
        if was_bursting {
            info!("burst cancelled by reset");
            self.sink.emit(BurstEvent::Ended {
                reason: EndReason::Reset,
            });
        }
    }

    /// Advances the burst timer; expiry happens here, never behind the caller's back.
    pub fn tick(&mut self, dt: Duration) {
        let Phase::Bursting { elapsed } = &mut self.phase else {
            return;
        };
        *elapsed += dt;
        if *elapsed >= self.config.burst_duration() {
            self.end_burst();
        }
    }

    fn start_burst(&mut self) {
        if self.is_bursting() {
            return;
        }
        self.fortune = self.config.max_fortune;
        self.phase = Phase::Bursting {
            elapsed: Duration::ZERO,
        };
        info!("burst started for {} ms", self.config.burst_duration_ms);
        self.sink.emit(BurstEvent::Started);
    }

    fn end_burst(&mut self) {
        self.phase = Phase::Idle;
        // Leave a floor so the player isn't one hit from game over right after.
        self.fortune = self.config.max_fortune * self.config.safety_floor;
        info!("burst expired; fortune floored at {}", self.fortune);
        self.sink.emit(BurstEvent::Ended {
            reason: EndReason::Expired,
        });
    }

    pub fn fortune(&self) -> f32 {
        self.fortune
    }

    pub fn max_fortune(&self) -> f32 {
        self.config.max_fortune
    }

    pub fn fortune_percent(&self) -> f32 {
        self.fortune / self.config.max_fortune
    }

    pub fn is_bursting(&self) -> bool {
        matches!(self.phase, Phase::Bursting { .. })
    }

    /// Remaining share of the burst in `[0, 1]`; zero when idle.
    pub fn burst_progress(&self) -> f32 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Bursting { elapsed } => {
                let total = self.config.burst_duration().as_secs_f32();
                ((total - elapsed.as_secs_f32()) / total).clamp(0.0, 1.0)
            }
        }
    }

    pub fn state(&self) -> FortuneState {
        let burst_elapsed = match self.phase {
            Phase::Idle => Duration::ZERO,
            Phase::Bursting { elapsed } => elapsed,
        };
        FortuneState {
            fortune: self.fortune,
            is_bursting: self.is_bursting(),
            burst_elapsed,
        }
    }

    pub fn config(&self) -> &FortuneConfig {
        &self.config
    }
}
