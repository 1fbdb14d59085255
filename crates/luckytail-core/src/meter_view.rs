use crate::color::Rgb;
use crate::config::MeterConfig;
use crate::events::BurstSink;
use crate::fortune::FortuneMeter;

/// What the HUD bar should draw this frame. Built from the meter, never written back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterView {
    /// Filled share of the bar: fortune while idle, remaining burst time while bursting.
    pub fill: f32,
    pub fill_width: f32,
    pub color: Rgb,
    /// Outline drawn around the whole bar during a burst.
    pub glow: Option<Rgb>,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl MeterView {
    pub fn compute<S: BurstSink>(meter: &FortuneMeter<S>, config: &MeterConfig) -> Self {
        let (fill, color, glow) = if meter.is_bursting() {
            let progress = meter.burst_progress();
            // Burning rope: fresh color at full, spent color as it runs out.
            let color = config
                .burst_spent_color
                .lerp(config.burst_fresh_color, progress);
            (progress, color, Some(config.glow_color))
        } else {
            (meter.fortune_percent(), config.idle_color, None)
        };
        let fill = fill.clamp(0.0, 1.0);
        Self {
            fill,
            fill_width: config.width * fill,
            color,
            glow,
            width: config.width,
            height: config.height,
            corner_radius: config.corner_radius,
        }
    }

    pub fn has_fill(&self) -> bool {
        self.fill > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FortuneConfig;
    use std::time::Duration;

    #[test]
    fn idle_bar_is_gold_and_proportional() {
        let mut meter = FortuneMeter::detached(FortuneConfig::default());
        meter.add_fortune(40.0);
        let view = MeterView::compute(&meter, &MeterConfig::default());
        assert_eq!(view.color, Rgb::GOLD);
        assert_eq!(view.glow, None);
        assert!((view.fill_width - 80.0).abs() < 1e-4);
    }

    #[test]
    fn empty_bar_has_no_fill() {
        let meter = FortuneMeter::detached(FortuneConfig::default());
        let view = MeterView::compute(&meter, &MeterConfig::default());
        assert!(!view.has_fill());
    }

    #[test]
    fn burst_bar_burns_from_orange_to_purple() {
        let mut meter = FortuneMeter::detached(FortuneConfig::default());
        meter.add_fortune(100.0);
        let config = MeterConfig::default();

        let fresh = MeterView::compute(&meter, &config);
        assert_eq!(fresh.color, Rgb::from_rgb(255, 100, 0));
        assert_eq!(fresh.glow, Some(Rgb::WHITE));
        assert_eq!(fresh.fill, 1.0);

        meter.tick(Duration::from_millis(2500));
        let half = MeterView::compute(&meter, &config);
        assert_eq!(half.color, Rgb::from_rgb(255, 50, 128));
        assert!((half.fill - 0.5).abs() < 1e-4);
    }
}
