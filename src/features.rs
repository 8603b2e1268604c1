use crate::position::*;
use serde::{Deserialize, Serialize};

/// Runtime switches and tuning values. Every field has a default so a
/// partial (or empty) JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaulFeatures {
    /// K in `quantity / (K * distance)` when ranking pickups.
    pub pickup_distance_scalar: f64,
    /// K in `quantity / (K * distance)` when ranking dropoffs.
    pub dropoff_distance_scalar: f64,
    /// Ticks of carrier throughput below which a carrier pickup is abandoned.
    pub dry_guard_ticks: u32,
    /// Resource extracted per work part per tick.
    pub harvest_power: u32,
    pub monitored_zones: Vec<ZoneId>,
    pub primary_zone: ZoneId,
    pub log_task_pools: bool,
}

impl Default for HaulFeatures {
    fn default() -> HaulFeatures {
        HaulFeatures {
            pickup_distance_scalar: 10.0,
            dropoff_distance_scalar: 10.0,
            dry_guard_ticks: 1,
            harvest_power: 2,
            monitored_zones: vec![ZoneId(0)],
            primary_zone: ZoneId(0),
            log_task_pools: false,
        }
    }
}

impl HaulFeatures {
    pub fn from_json(data: &str) -> Result<HaulFeatures, String> {
        let features: HaulFeatures = serde_json::from_str(data).map_err(|e| e.to_string())?;

        features.validate()?;

        Ok(features)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.pickup_distance_scalar > 0.0) {
            return Err(format!("pickup_distance_scalar must be positive, got {}", self.pickup_distance_scalar));
        }

        if !(self.dropoff_distance_scalar > 0.0) {
            return Err(format!("dropoff_distance_scalar must be positive, got {}", self.dropoff_distance_scalar));
        }

        if self.monitored_zones.is_empty() {
            return Err("monitored_zones must name at least one zone".to_string());
        }

        Ok(())
    }

    /// Resource an agent with `work_parts` extracts in the guard window.
    pub fn dry_threshold(&self, work_parts: u32) -> u32 {
        work_parts * self.harvest_power * self.dry_guard_ticks
    }
}
