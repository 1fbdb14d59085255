//! Headless stand-in for the engine loop: a scripted avatar, a fixed spawn
//! schedule and a 60 Hz clock feeding `RunSession`.

use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::Receiver;
use glam::Vec2;
use luckytail_core::{
    BurstEvent, CollisionKind, CollisionOutcome, GameConfig, Leader, RunSession, SegmentInstance,
};
use luckytail_platform::{FrameSink, Result, TracingFrameSink};
use tracing::{debug, info, warn};

const FRAME: Duration = Duration::from_micros(16_667);
const DEFAULT_FRAMES: u64 = 3600;

pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub frames: u64,
}

impl RunOptions {
    /// `[config.toml|config.json] [frames]`
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let config_path = args.next().map(PathBuf::from);
        let frames = match args.next() {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("frame count {raw:?} is not a number: {e}"))?,
            None => DEFAULT_FRAMES,
        };
        Ok(Self {
            config_path,
            frames,
        })
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub frames: u64,
    pub score: u32,
    pub bursts: u32,
    pub game_over: bool,
}

/// Weaves across a 1280x720 field on a Lissajous path.
struct ScriptedAvatar {
    time: f32,
    position: Vec2,
    velocity: Vec2,
}

impl ScriptedAvatar {
    fn new() -> Self {
        let mut avatar = Self {
            time: 0.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        };
        avatar.advance(Duration::ZERO);
        avatar
    }

    fn advance(&mut self, dt: Duration) {
        self.time += dt.as_secs_f32();
        let t = self.time;
        self.position = Vec2::new(640.0 + 300.0 * (t * 0.7).sin(), 360.0 + 200.0 * (t * 1.3).sin());
        self.velocity = Vec2::new(210.0 * (t * 0.7).cos(), 260.0 * (t * 1.3).cos());
    }
}

impl Leader for ScriptedAvatar {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Fixed spawn cadence; an obstacle wins when both fall on the same frame.
struct Spawner {
    collectible_every: u64,
    obstacle_every: u64,
}

impl Spawner {
    fn due(&self, frame: u64) -> Option<CollisionKind> {
        if frame % self.obstacle_every == 0 {
            Some(CollisionKind::Obstacle)
        } else if frame % self.collectible_every == 0 {
            Some(CollisionKind::Collectible)
        } else {
            None
        }
    }
}

pub fn run_headless(options: &RunOptions) -> Result<RunReport> {
    let config = match &options.config_path {
        Some(path) => {
            info!("loading config from {}", path.display());
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };

    let (burst_tx, burst_rx) = crossbeam_channel::unbounded::<BurstEvent>();
    let mut avatar = ScriptedAvatar::new();
    let mut session = RunSession::new(config, avatar.position(), burst_tx);
    let spawner = Spawner {
        collectible_every: 40,
        obstacle_every: 210,
    };
    let mut frame_sink = TracingFrameSink::new(120);
    let mut instances: Vec<SegmentInstance> = Vec::new();
    let mut report = RunReport::default();

    for frame in 1..=options.frames {
        avatar.advance(FRAME);
        if let Some(kind) = spawner.due(frame) {
            let outcome = session.collide(kind);
            debug!("frame {frame}: {kind:?} -> {outcome:?}");
            if outcome == CollisionOutcome::GameOver {
                report.game_over = true;
            }
        }

        let outcome = session.update(&avatar, FRAME);
        if let Some(fault) = outcome.fault() {
            warn!("frame {frame}: tail fault {fault}");
        }
        report.bursts += log_burst_events(&burst_rx, frame);

        session.avatar().tail().instances(&mut instances);
        frame_sink.present(&session.summary(&avatar))?;
        report.frames = frame;
        if report.game_over {
            break;
        }
    }
    frame_sink.flush()?;

    report.score = session.score();
    if session.skipped_frames() > 0 {
        warn!("{} frames skipped tail updates", session.skipped_frames());
    }
    debug!("last frame drew {} tail instances", instances.len());
    Ok(report)
}

fn log_burst_events(rx: &Receiver<BurstEvent>, frame: u64) -> u32 {
    let mut started = 0;
    for event in rx.try_iter() {
        info!("frame {frame}: {} ({event:?})", event.name());
        if event == BurstEvent::Started {
            started += 1;
        }
    }
    started
}
