//! Lucky Tail core: engine-agnostic logic for the avatar's trailing tail and the fortune meter.
//!
//! Everything here is driven by the host loop once per frame. Nothing spawns threads or
//! timers; the burst timer and all smoothing run off the `dt` the host passes in.

pub mod avatar;
pub mod collision;
pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod fortune;
pub mod math;
pub mod meter_view;
pub mod session;
pub mod tail;

pub use avatar::{AvatarVisuals, ParticleEmitter};
pub use collision::{resolve_collision, CollisionKind, CollisionOutcome};
pub use color::Rgb;
pub use config::{AvatarConfig, FortuneConfig, GameConfig, MeterConfig, TailConfig};
pub use error::{ConfigError, TailFault};
pub use events::{BurstEvent, BurstSink, EndReason, SinkList};
pub use fortune::{FortuneMeter, FortuneState};
pub use meter_view::MeterView;
pub use session::RunSession;
pub use tail::{SegmentInstance, SegmentSkin, TailFollower, TailSegment, TailTexture, TickOutcome};

pub use luckytail_platform::{Leader, LeaderPose};
