use anyhow::Result;
use geom::Duration;
use serde::{Deserialize, Serialize};

use crate::Viewport;

const MIN_TICK_SECS: f64 = 0.001;
const MAX_TICK_SECS: f64 = 86_400.0;

/// Tunable knobs for the simulation and its presentation. Every field has a default, so a
/// settings file only needs to mention what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How often vehicles advance one point along their route
    pub tick_secs: f64,
    pub reseed: Reseed,

    pub lat_padding: f64,
    pub lng_padding: f64,
    /// In degrees. Padded spans never shrink below this.
    pub min_span: f64,
    pub default_viewport: Viewport,

    pub selected_stroke_width: f64,
    pub stroke_width: f64,
    pub dimmed_opacity: f64,

    pub tap_tolerance_meters: f64,
    pub marker_radius_meters: f64,
}

/// What happens to vehicles when the set of active lines changes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reseed {
    /// Throw every vehicle away and seed all active lines from scratch
    Replace,
    /// Only seed newly active lines and remove newly inactive ones. Lines that stay active keep
    /// their progress.
    Diff,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_secs: 1.0,
            reseed: Reseed::Replace,

            lat_padding: 1.25,
            lng_padding: 1.35,
            min_span: 0.01,
            default_viewport: Viewport {
                center_lat: 40.6300,
                center_lng: -8.6577,
                lat_span: 0.05,
                lng_span: 0.05,
            },

            selected_stroke_width: 9.0,
            stroke_width: 5.0,
            dimmed_opacity: 0.6,

            tap_tolerance_meters: 30.0,
            marker_radius_meters: 24.0,
        }
    }
}

impl Settings {
    pub fn tick_period(&self) -> Duration {
        Duration::seconds(self.tick_secs)
    }

    pub fn from_json<R: std::io::Read>(reader: R) -> Result<Self> {
        let settings: Settings = serde_json::from_reader(reader)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        // Finer than a millisecond rounds to a zero period; past a day is surely a typo
        if !(MIN_TICK_SECS..=MAX_TICK_SECS).contains(&self.tick_secs) {
            bail!(
                "tick_secs must be between {MIN_TICK_SECS} and {MAX_TICK_SECS}, not {}",
                self.tick_secs
            );
        }
        for (name, x) in [
            ("lat_padding", self.lat_padding),
            ("lng_padding", self.lng_padding),
        ] {
            if !x.is_finite() || x < 1.0 {
                bail!("{name} must be a finite number at least 1.0, not {x}");
            }
        }
        if !self.min_span.is_finite() || self.min_span <= 0.0 {
            bail!("min_span must be positive, not {}", self.min_span);
        }
        let v = &self.default_viewport;
        if ![v.center_lat, v.center_lng, v.lat_span, v.lng_span]
            .iter()
            .all(|x| x.is_finite())
        {
            bail!("default_viewport has a non-finite value: {v:?}");
        }
        if !(0.0..=1.0).contains(&self.dimmed_opacity) {
            bail!("dimmed_opacity must be in [0, 1], not {}", self.dimmed_opacity);
        }
        for (name, x) in [
            ("selected_stroke_width", self.selected_stroke_width),
            ("stroke_width", self.stroke_width),
            ("tap_tolerance_meters", self.tap_tolerance_meters),
            ("marker_radius_meters", self.marker_radius_meters),
        ] {
            if !x.is_finite() || x < 0.0 {
                bail!("{name} must be a finite, non-negative number, not {x}");
            }
        }
        Ok(())
    }
}
