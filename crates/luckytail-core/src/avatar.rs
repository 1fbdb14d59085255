//! Head-and-tail presentation state of the player avatar.
//!
//! Burst visuals follow the meter: `update` reads `is_bursting()` every frame and
//! reacts to the edge, so there is no second copy of the flag to drift.

use std::time::Duration;

use glam::Vec2;
use luckytail_platform::Leader;
use tracing::debug;

use crate::color::Rgb;
use crate::config::{AvatarConfig, GameConfig};
use crate::events::BurstSink;
use crate::fortune::FortuneMeter;
use crate::tail::{TailFollower, TailTexture, TickOutcome};

/// Sparkle emitter that runs only during a burst.
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    interval: Duration,
    active: bool,
    accumulated: Duration,
}

impl ParticleEmitter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: false,
            accumulated: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.accumulated = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of particles due after `dt`.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.active || self.interval.is_zero() {
            return 0;
        }
        self.accumulated += dt;
        let due = (self.accumulated.as_nanos() / self.interval.as_nanos()) as u32;
        self.accumulated -= self.interval * due;
        due
    }
}

pub struct AvatarVisuals {
    config: AvatarConfig,
    tail: TailFollower,
    bursting: bool,
    hue: f32,
    tint: Option<Rgb>,
    alpha: f32,
    bonk_remaining: Option<Duration>,
    emitter: ParticleEmitter,
    particles_due: u32,
}

impl AvatarVisuals {
    pub fn new(config: &GameConfig, origin: Vec2) -> Self {
        let tail = TailFollower::new(config.tail.clone(), origin).behind(config.avatar.head_depth);
        let emitter =
            ParticleEmitter::new(Duration::from_millis(config.avatar.particle_interval_ms));
        Self {
            config: config.avatar.clone(),
            tail,
            bursting: false,
            hue: 0.0,
            tint: None,
            alpha: 1.0,
            bonk_remaining: None,
            emitter,
            particles_due: 0,
        }
    }

    /// Per-frame update: mirrors the meter, sizes and advances the tail, runs the
    /// bonk timer and the rainbow cycle.
    pub fn update<S: BurstSink>(
        &mut self,
        leader: &impl Leader,
        meter: &FortuneMeter<S>,
        dt: Duration,
    ) -> TickOutcome {
        self.sync_burst(meter.is_bursting());

        self.tail.set_length(self.tail_length_for(meter.fortune_percent()));
        let direction = if leader.velocity().x < -self.config.direction_deadzone {
            -1.0
        } else {
            1.0
        };
        let outcome = self.tail.tick(leader, direction, dt);

        if let Some(remaining) = self.bonk_remaining {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.end_bonk();
            } else {
                self.bonk_remaining = Some(remaining);
            }
        }

        if self.bursting {
            let dt_ms = dt.as_secs_f32() * 1000.0;
            self.hue = (self.hue + self.config.hue_rate_per_ms * dt_ms).rem_euclid(1.0);
            let color = Rgb::from_hsl(self.hue, 1.0, 0.5);
            self.tint = Some(color);
            self.tail.set_tint(color);
        }

        self.particles_due = self.emitter.advance(dt);
        outcome
    }

    /// Tail length for a fortune share in `[0, 1]`.
    pub fn tail_length_for(&self, percent: f32) -> usize {
        let extra = (percent.clamp(0.0, 1.0) * self.config.tail_length_span as f32).floor();
        self.config.tail_length_base + extra as usize
    }

    /// Aligns the burst visuals with the meter's current state.
    pub fn sync_burst(&mut self, bursting: bool) {
        if bursting == self.bursting {
            return;
        }
        self.bursting = bursting;
        if bursting {
            debug!("avatar: burst visuals on");
            self.hue = 0.0;
            self.emitter.start();
            self.tail.set_texture(TailTexture::Golden);
        } else {
            debug!("avatar: burst visuals off");
            self.tint = None;
            self.tail.restore_color();
            self.emitter.stop();
        }
    }

    /// Hit flash. Ignored while already flashing or while invincible.
    pub fn bonk(&mut self) -> bool {
        if self.bonk_remaining.is_some() || self.bursting {
            return false;
        }
        self.bonk_remaining = Some(self.config.bonk_duration());
        self.alpha = self.config.bonk_alpha;
        self.tint = Some(self.config.bonk_tint);
        self.tail.set_tint(self.config.bonk_tint);
        true
    }

    fn end_bonk(&mut self) {
        self.bonk_remaining = None;
        self.alpha = 1.0;
        self.tint = None;
        self.tail.clear_tint();
    }

    pub fn is_bonked(&self) -> bool {
        self.bonk_remaining.is_some()
    }

    pub fn is_bursting(&self) -> bool {
        self.bursting
    }

    /// Head tint; the tail carries its own copy.
    pub fn tint(&self) -> Option<Rgb> {
        self.tint
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn emitter(&self) -> &ParticleEmitter {
        &self.emitter
    }

    /// Particles the emitter wants spawned this frame.
    pub fn particles_due(&self) -> u32 {
        self.particles_due
    }

    pub fn tail(&self) -> &TailFollower {
        &self.tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FortuneConfig;
    use luckytail_platform::LeaderPose;

    const FRAME: Duration = Duration::from_millis(10);

    fn setup() -> (AvatarVisuals, FortuneMeter) {
        let config = GameConfig::default();
        let avatar = AvatarVisuals::new(&config, Vec2::ZERO);
        let meter = FortuneMeter::detached(FortuneConfig::default());
        (avatar, meter)
    }

    fn idle() -> LeaderPose {
        LeaderPose::new(Vec2::new(100.0, 100.0), Vec2::ZERO)
    }

    #[test]
    fn tail_length_follows_fortune() {
        let (mut avatar, mut meter) = setup();
        avatar.update(&idle(), &meter, FRAME);
        assert_eq!(avatar.tail().length(), 2);

        meter.add_fortune(50.0);
        avatar.update(&idle(), &meter, FRAME);
        assert_eq!(avatar.tail().length(), 11);
        assert_eq!(avatar.tail().visible_segments().count(), 11);
        assert_eq!(avatar.tail_length_for(1.0), 20);
    }

    #[test]
    fn leftward_motion_flips_direction() {
        let (mut avatar, meter) = setup();
        let left = LeaderPose::new(Vec2::ZERO, Vec2::new(-300.0, 0.0));
        for _ in 0..100 {
            avatar.update(&left, &meter, FRAME);
        }
        assert!(avatar.tail().direction() < -0.99);

        // Slow drift inside the deadzone still counts as facing right.
        let (mut avatar, meter) = setup();
        let drift = LeaderPose::new(Vec2::ZERO, Vec2::new(-4.0, 0.0));
        avatar.update(&drift, &meter, FRAME);
        assert_eq!(avatar.tail().direction(), 1.0);
    }

    #[test]
    fn burst_cycles_hue_and_ends_clean() {
        let (mut avatar, mut meter) = setup();
        meter.add_fortune(100.0);
        avatar.update(&idle(), &meter, FRAME);
        assert!(avatar.is_bursting());
        assert!((avatar.hue() - 0.05).abs() < 1e-5);
        assert_eq!(avatar.tint(), Some(Rgb::from_hsl(avatar.hue(), 1.0, 0.5)));
        assert_eq!(avatar.tail().tint(), avatar.tint());
        assert_eq!(avatar.tail().texture(), TailTexture::Golden);
        assert!(avatar.emitter().is_active());

        meter.reset_fortune();
        avatar.update(&idle(), &meter, FRAME);
        assert!(!avatar.is_bursting());
        assert_eq!(avatar.tint(), None);
        assert_eq!(avatar.tail().tint(), None);
        assert_eq!(avatar.tail().texture(), TailTexture::Base);
        assert!(!avatar.emitter().is_active());
        assert_eq!(avatar.particles_due(), 0);
    }

    #[test]
    fn emitter_spawns_at_interval() {
        let mut emitter = ParticleEmitter::new(Duration::from_millis(20));
        assert_eq!(emitter.advance(Duration::from_millis(50)), 0);
        emitter.start();
        assert_eq!(emitter.advance(Duration::from_millis(50)), 2);
        assert_eq!(emitter.advance(Duration::from_millis(10)), 1);
        assert_eq!(emitter.advance(Duration::from_millis(10)), 0);
    }

    #[test]
    fn bonk_flashes_then_clears() {
        let (mut avatar, meter) = setup();
        assert!(avatar.bonk());
        assert!(!avatar.bonk());
        assert_eq!(avatar.alpha(), 0.5);
        assert_eq!(avatar.tint(), Some(Rgb::RED));
        assert_eq!(avatar.tail().tint(), Some(Rgb::RED));

        for _ in 0..49 {
            avatar.update(&idle(), &meter, FRAME);
        }
        assert!(avatar.is_bonked());
        avatar.update(&idle(), &meter, FRAME);
        assert!(!avatar.is_bonked());
        assert_eq!(avatar.alpha(), 1.0);
        assert_eq!(avatar.tail().tint(), None);
    }

    #[test]
    fn bonk_ignored_during_burst() {
        let (mut avatar, mut meter) = setup();
        meter.add_fortune(100.0);
        avatar.update(&idle(), &meter, FRAME);
        assert!(!avatar.bonk());
        assert_eq!(avatar.alpha(), 1.0);
    }
}
