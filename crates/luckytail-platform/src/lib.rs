//! Engine abstraction traits so `luckytail-core` stays runtime-agnostic.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Kinematic snapshot of a leader for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderPose {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl LeaderPose {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }
}

/// Entity a trailing chain follows. The core only ever reads it.
pub trait Leader {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
}

impl Leader for LeaderPose {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Per-frame state handed to the presentation side (renderer, HUD, recorder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSummary {
    pub frame: u64,
    pub leader: Vec2,
    pub visible_segments: usize,
    pub tip: Option<Vec2>,
    pub fortune_percent: f32,
    pub bursting: bool,
    pub burst_progress: f32,
    pub score: u32,
}

/// Presentation backend fed once per frame.
pub trait FrameSink {
    fn present(&mut self, summary: &FrameSummary) -> Result<()>;
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Logs every `every`-th frame through `tracing`; stands in for a renderer in headless runs.
pub struct TracingFrameSink {
    every: u64,
}

impl TracingFrameSink {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl FrameSink for TracingFrameSink {
    fn present(&mut self, summary: &FrameSummary) -> Result<()> {
        if summary.frame % self.every == 0 {
            info!(
                "frame {} leader=({:.1}, {:.1}) tail={} fortune={:.0}% bursting={} progress={:.2} score={}",
                summary.frame,
                summary.leader.x,
                summary.leader.y,
                summary.visible_segments,
                summary.fortune_percent * 100.0,
                summary.bursting,
                summary.burst_progress,
                summary.score
            );
        }
        Ok(())
    }
}
