//! Procedural trailing body.
//!
//! The follower records where the leader has been and places a fixed pool of
//! segments at time-delayed samples of that history. On top of the delay each
//! segment is pushed back horizontally by a per-segment offset, which keeps the
//! chain looking rigid even when the leader stands still. The offset flips with
//! the smoothed facing direction and compresses while the leader moves
//! diagonally.

use std::collections::VecDeque;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use luckytail_platform::Leader;
use tracing::{trace, warn};

use crate::color::Rgb;
use crate::config::TailConfig;
use crate::error::TailFault;
use crate::math::{angle_between, frame_alpha, frame_step, lerp, rotate_toward, wrap_angle};

/// Which sprite a segment shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSkin {
    Body,
    /// End cap on the furthest visible segment.
    Tip,
}

/// Texture set the whole tail draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TailTexture {
    #[default]
    Base,
    Golden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TailSegment {
    scale: f32,
    visible: bool,
    position: Vec2,
    rotation: f32,
    skin: SegmentSkin,
}

impl TailSegment {
    fn new(scale: f32, position: Vec2) -> Self {
        Self {
            scale,
            visible: false,
            position,
            rotation: 0.0,
            skin: SegmentSkin::Body,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
    pub fn is_visible(&self) -> bool {
        self.visible
    }
    pub fn position(&self) -> Vec2 {
        self.position
    }
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
    pub fn skin(&self) -> SegmentSkin {
        self.skin
    }
    pub fn is_tip(&self) -> bool {
        self.skin == SegmentSkin::Tip
    }
}

/// GPU-ready record for one visible segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SegmentInstance {
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: f32,
    pub tint: [f32; 4],
    pub flags: u32,
}

impl SegmentInstance {
    pub const FLAG_TIP: u32 = 1;
    pub const FLAG_GOLDEN: u32 = 1 << 1;
    pub const FLAG_TINTED: u32 = 1 << 2;
}

/// Result of one [`TailFollower::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Every visible segment was placed. `fallback` counts segments that had to
    /// use the oldest sample because the history was still too short.
    Applied { visible: usize, fallback: usize },
    /// Some segments kept their previous pose.
    Partial {
        visible: usize,
        skipped: Vec<(usize, TailFault)>,
    },
    /// Nothing was touched this frame.
    Skipped(TailFault),
}

impl TickOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TickOutcome::Applied { .. })
    }

    pub fn fault(&self) -> Option<&TailFault> {
        match self {
            TickOutcome::Applied { .. } => None,
            TickOutcome::Partial { skipped, .. } => skipped.first().map(|(_, fault)| fault),
            TickOutcome::Skipped(fault) => Some(fault),
        }
    }
}

pub struct TailFollower {
    config: TailConfig,
    segments: Vec<TailSegment>,
    history: VecDeque<Vec2>,
    current_length: usize,
    direction: f32,
    spacing_factor: f32,
    tip_index: Option<usize>,
    depth: i32,
    tint: Option<Rgb>,
    texture: TailTexture,
}

impl TailFollower {
    /// Builds the whole segment pool up front, hidden and parked at `origin`.
    pub fn new(mut config: TailConfig, origin: Vec2) -> Self {
        config.max_segments = config.max_segments.max(1);
        config.segment_spacing = config.segment_spacing.max(1);
        config.min_length = config.min_length.clamp(1, config.max_segments);
        let count = config.max_segments;
        let segments = (0..count)
            .map(|i| {
                let scale = config.base_scale - (i as f32 / count as f32) * config.scale_falloff;
                TailSegment::new(scale, origin)
            })
            .collect();
        let history = VecDeque::with_capacity(config.history_capacity() + 1);
        let current_length = config.initial_length.clamp(config.min_length, count);
        Self {
            config,
            segments,
            history,
            current_length,
            direction: 1.0,
            spacing_factor: 1.0,
            tip_index: None,
            depth: -1,
            tint: None,
            texture: TailTexture::Base,
        }
    }

    /// Draws the tail one layer under a leader at `leader_depth`.
    pub fn behind(mut self, leader_depth: i32) -> Self {
        self.depth = leader_depth - 1;
        self
    }

    pub fn set_length(&mut self, length: usize) {
        self.current_length = length.clamp(self.config.min_length, self.config.max_segments);
    }

    pub fn length(&self) -> usize {
        self.current_length
    }

    /// Advances the tail by one frame.
    ///
    /// Never fails: a bad leader sample skips the frame before anything is
    /// mutated, and a segment whose pose comes out non-finite keeps the pose it
    /// had while still being shown. Both cases are logged and reported in the returned outcome.
    pub fn tick(&mut self, leader: &impl Leader, direction_hint: f32, dt: Duration) -> TickOutcome {
        let position = leader.position();
        let velocity = leader.velocity();
        if !position.is_finite() || !velocity.is_finite() {
            let fault = TailFault::NonFiniteLeader { position, velocity };
            warn!("tail tick skipped: {fault}");
            return TickOutcome::Skipped(fault);
        }
        if !direction_hint.is_finite() {
            let fault = TailFault::NonFiniteHint(direction_hint);
            warn!("tail tick skipped: {fault}");
            return TickOutcome::Skipped(fault);
        }

        let hz = self.config.reference_hz;
        let direction_alpha = frame_alpha(self.config.direction_smoothing, dt, hz);
        let spacing_alpha = frame_alpha(self.config.spacing_smoothing, dt, hz);
        let rotation_step = frame_step(self.config.rotation_step, dt, hz);

        self.direction = lerp(self.direction, direction_hint, direction_alpha);

        self.history.push_front(position);
        self.history.truncate(self.config.history_capacity());

        let threshold = self.config.diagonal_threshold;
        let diagonal = velocity.x.abs() > threshold && velocity.y.abs() > threshold;
        let target_spacing = if diagonal {
            self.config.diagonal_spacing
        } else {
            1.0
        };
        self.spacing_factor = lerp(self.spacing_factor, target_spacing, spacing_alpha);

        let body_unit = self.config.base_body_offset * self.spacing_factor;
        let tip_extra =
            (self.config.tail_offset_unit - self.config.base_body_offset) * self.spacing_factor;

        let length = self.current_length;
        self.mark_tip(length - 1);

        let mut fallback = 0;
        let mut skipped = Vec::new();
        for i in 0..length {
            let lookup = (i + 1) * self.config.segment_spacing;
            let sample = match self.history.get(lookup) {
                Some(sample) => *sample,
                None => {
                    fallback += 1;
                    // The current position was pushed above, so `back` is always there.
                    self.history.back().copied().unwrap_or(position)
                }
            };

            let mut total_offset = (i + 1) as f32 * body_unit;
            if i == length - 1 {
                total_offset += tip_extra;
            }
            let placed = Vec2::new(sample.x - total_offset * self.direction, sample.y);

            let look_at = if i == 0 {
                position
            } else {
                self.segments[i - 1].position
            };
            let segment = &mut self.segments[i];
            segment.visible = true;
            let target_angle = angle_between(placed, look_at);
            let rotation = wrap_angle(rotate_toward(segment.rotation, target_angle, rotation_step));

            if !placed.is_finite() || !rotation.is_finite() {
                skipped.push((i, TailFault::NonFinitePose { index: i }));
                continue;
            }
            segment.position = placed;
            segment.rotation = rotation;
        }

        for segment in self.segments.iter_mut().skip(length) {
            segment.visible = false;
        }

        trace!(
            "tail tick: dir={:.3} spacing={:.3} history={} visible={}",
            self.direction,
            self.spacing_factor,
            self.history.len(),
            length
        );

        if skipped.is_empty() {
            TickOutcome::Applied {
                visible: length,
                fallback,
            }
        } else {
            for (index, fault) in &skipped {
                warn!("tail segment {index} left in place: {fault}");
            }
            TickOutcome::Partial {
                visible: length,
                skipped,
            }
        }
    }

    /// Moves the tip skin to `index`, reverting the previous tip to a body skin.
    fn mark_tip(&mut self, index: usize) {
        if self.tip_index == Some(index) {
            return;
        }
        if let Some(previous) = self.tip_index {
            self.segments[previous].skin = SegmentSkin::Body;
        }
        self.segments[index].skin = SegmentSkin::Tip;
        self.tip_index = Some(index);
    }

    pub fn set_tint(&mut self, color: Rgb) {
        self.tint = Some(color);
    }

    pub fn clear_tint(&mut self) {
        self.tint = None;
    }

    pub fn set_texture(&mut self, texture: TailTexture) {
        self.texture = texture;
    }

    /// Drops any tint and goes back to the base texture.
    pub fn restore_color(&mut self) {
        self.tint = None;
        self.texture = TailTexture::Base;
    }

    pub fn tint(&self) -> Option<Rgb> {
        self.tint
    }

    pub fn texture(&self) -> TailTexture {
        self.texture
    }

    pub fn segments(&self) -> &[TailSegment] {
        &self.segments
    }

    pub fn visible_segments(&self) -> impl Iterator<Item = &TailSegment> + '_ {
        self.segments.iter().filter(|s| s.visible)
    }

    pub fn tip(&self) -> Option<&TailSegment> {
        self.tip_index
            .map(|i| &self.segments[i])
            .filter(|s| s.visible)
    }

    pub fn history(&self) -> &VecDeque<Vec2> {
        &self.history
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn spacing_factor(&self) -> f32 {
        self.spacing_factor
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn config(&self) -> &TailConfig {
        &self.config
    }

    /// Writes the visible segments into `out` for instanced drawing. The tip
    /// comes first so segments nearer the head draw over the ones behind them.
    pub fn instances(&self, out: &mut Vec<SegmentInstance>) {
        out.clear();
        let tint = self.tint.unwrap_or(Rgb::WHITE).to_rgba_f32();
        let mut shared = 0;
        if self.texture == TailTexture::Golden {
            shared |= SegmentInstance::FLAG_GOLDEN;
        }
        if self.tint.is_some() {
            shared |= SegmentInstance::FLAG_TINTED;
        }
        for segment in self.segments.iter().rev().filter(|s| s.visible) {
            let mut flags = shared;
            if segment.is_tip() {
                flags |= SegmentInstance::FLAG_TIP;
            }
            out.push(SegmentInstance {
                position: segment.position.to_array(),
                rotation: segment.rotation,
                scale: segment.scale,
                tint,
                flags,
            });
        }
    }
}
