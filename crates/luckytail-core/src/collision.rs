use tracing::info;

use crate::avatar::AvatarVisuals;
use crate::events::BurstSink;
use crate::fortune::FortuneMeter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Collectible,
    Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    Collected { score: u32 },
    /// Hit while invincible; the obstacle is destroyed.
    Smashed,
    /// Fortune absorbed the hit and is gone.
    Bonked,
    GameOver,
}

/// Applies an overlap reported by the physics side to the meter and the avatar.
pub fn resolve_collision<S: BurstSink>(
    kind: CollisionKind,
    meter: &mut FortuneMeter<S>,
    avatar: &mut AvatarVisuals,
) -> CollisionOutcome {
    match kind {
        CollisionKind::Collectible => {
            let amount = meter.config().pickup_amount;
            let score = meter.config().pickup_score;
            meter.add_fortune(amount);
            CollisionOutcome::Collected { score }
        }
        CollisionKind::Obstacle if meter.is_bursting() => CollisionOutcome::Smashed,
        CollisionKind::Obstacle if meter.fortune() > 0.0 => {
            meter.reset_fortune();
            avatar.sync_burst(meter.is_bursting());
            avatar.bonk();
            CollisionOutcome::Bonked
        }
        CollisionKind::Obstacle => {
            info!("obstacle hit with no fortune left");
            CollisionOutcome::GameOver
        }
    }
}
