//! Synthetic gate-camera and loading-bay event generation.
//!
//! Nothing here touches dashboard state. [`EventGenerator`] turns a
//! random source into plates, confidence readings, camera frame
//! references and goods quantities; the dashboard decides what to do
//! with them.

use rand::Rng;

use crate::config::SimulationConfig;

/// Placeholder substituted in the snapshot URL template.
const SEED_PLACEHOLDER: &str = "{seed}";

/// One synthetic vehicle detection.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDetection {
    /// Plate text: region, two digits, series, four digits (e.g. `MH27AB4410`).
    pub plate: String,
    /// Detection confidence percentage in `[floor, floor + span)`.
    pub confidence: f64,
    /// Camera frame reference for this detection.
    pub snapshot_url: String,
}

impl VehicleDetection {
    /// Confidence formatted to one decimal place with a trailing `%`.
    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence)
    }
}

/// Generates synthetic yard events from configuration and a random source.
#[derive(Debug, Clone)]
pub struct EventGenerator {
    config: SimulationConfig,
}

impl EventGenerator {
    /// Create a generator for the given parameters.
    pub const fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// The generator's parameters.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Fabricate a vehicle detection.
    pub fn detect_vehicle<R: Rng>(&self, rng: &mut R) -> VehicleDetection {
        let district: u16 = rng.random_range(10..=99);
        let serial: u16 = rng.random_range(1000..=9999);
        let plate = format!(
            "{}{district}{}{serial}",
            self.config.plate_region, self.config.plate_series
        );

        let floor = self.config.confidence_floor;
        let ceiling = floor + self.config.confidence_span;
        let unit: f64 = rng.random();
        let raw = unit.mul_add(self.config.confidence_span, floor);
        // A unit sample just under 1.0 can round up to the ceiling.
        let confidence = if raw < ceiling {
            raw
        } else {
            below(ceiling).max(floor)
        };

        let frame_seed: f64 = rng.random();
        let snapshot_url = self
            .config
            .snapshot_url_template
            .replace(SEED_PLACEHOLDER, &frame_seed.to_string());

        VehicleDetection {
            plate,
            confidence,
            snapshot_url,
        }
    }

    /// Fabricate a goods quantity in `[goods_min, goods_max]`.
    pub fn goods_amount<R: Rng>(&self, rng: &mut R) -> u64 {
        let low = self.config.goods_min;
        let high = self.config.goods_max.max(low);
        rng.random_range(low..=high)
    }

    /// Plate text shown between detections.
    pub fn idle_plate(&self) -> &str {
        &self.config.idle_plate
    }

    /// Snapshot reference shown between detections.
    pub fn placeholder_snapshot(&self) -> &str {
        &self.config.placeholder_snapshot
    }
}

/// The largest `f64` strictly below a positive finite `x`.
fn below(x: f64) -> f64 {
    f64::from_bits(x.to_bits().saturating_sub(1))
}
