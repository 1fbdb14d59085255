use std::time::Duration;

use glam::Vec2;
use luckytail_platform::{FrameSummary, Leader};
use tracing::{info, warn};

use crate::avatar::AvatarVisuals;
use crate::collision::{resolve_collision, CollisionKind, CollisionOutcome};
use crate::config::GameConfig;
use crate::events::BurstSink;
use crate::fortune::FortuneMeter;
use crate::meter_view::MeterView;
use crate::tail::TickOutcome;

/// One run of the game: meter, avatar visuals and score, advanced in lockstep.
pub struct RunSession<S: BurstSink = ()> {
    config: GameConfig,
    meter: FortuneMeter<S>,
    avatar: AvatarVisuals,
    score: u32,
    frame: u64,
    game_over: bool,
    skipped_frames: u64,
}

impl<S: BurstSink> RunSession<S> {
    pub fn new(config: GameConfig, origin: Vec2, sink: S) -> Self {
        let meter = FortuneMeter::new(config.fortune.clone(), sink);
        let avatar = AvatarVisuals::new(&config, origin);
        Self {
            config,
            meter,
            avatar,
            score: 0,
            frame: 0,
            game_over: false,
            skipped_frames: 0,
        }
    }

    /// Meter first, then visuals, so expiry in this frame is already visible to the tail.
    pub fn update(&mut self, leader: &impl Leader, dt: Duration) -> TickOutcome {
        self.frame += 1;
        self.meter.tick(dt);
        let outcome = self.avatar.update(leader, &self.meter, dt);
        if let TickOutcome::Skipped(_) = outcome {
            self.skipped_frames += 1;
        }
        outcome
    }

    pub fn collide(&mut self, kind: CollisionKind) -> CollisionOutcome {
        if self.game_over {
            warn!("collision reported after game over; ignoring");
            return CollisionOutcome::GameOver;
        }
        let outcome = resolve_collision(kind, &mut self.meter, &mut self.avatar);
        match outcome {
            CollisionOutcome::Collected { score } => self.score += score,
            CollisionOutcome::GameOver => {
                info!("game over at frame {} with score {}", self.frame, self.score);
                self.game_over = true;
            }
            CollisionOutcome::Smashed | CollisionOutcome::Bonked => {}
        }
        outcome
    }

    pub fn summary(&self, leader: &impl Leader) -> FrameSummary {
        let tail = self.avatar.tail();
        FrameSummary {
            frame: self.frame,
            leader: leader.position(),
            visible_segments: tail.visible_segments().count(),
            tip: tail.tip().map(|s| s.position()),
            fortune_percent: self.meter.fortune_percent(),
            bursting: self.meter.is_bursting(),
            burst_progress: self.meter.burst_progress(),
            score: self.score,
        }
    }

    pub fn meter_view(&self) -> MeterView {
        MeterView::compute(&self.meter, &self.config.meter)
    }

    pub fn meter(&self) -> &FortuneMeter<S> {
        &self.meter
    }

    pub fn meter_mut(&mut self) -> &mut FortuneMeter<S> {
        &mut self.meter
    }

    pub fn avatar(&self) -> &AvatarVisuals {
        &self.avatar
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }
}
