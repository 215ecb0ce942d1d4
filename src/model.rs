/// Shared data types for the aurora monitoring service.
///
/// Feed payloads are parsed into these types by `ingest::swpc`; the monitor
/// only ever sees `AuroraGrid` and `KpReading`, never raw JSON.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::clock::ClockError;

// ---------------------------------------------------------------------------
// Feed data
// ---------------------------------------------------------------------------

/// Grid key: whole-degree (longitude, latitude), as published by OVATION.
pub type GridPoint = (i32, i32);

/// One OVATION aurora snapshot, keyed and sorted by (longitude, latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct AuroraGrid {
    pub points: BTreeMap<GridPoint, f64>,
    pub observation_time: Option<String>,
    pub forecast_time: Option<String>,
}

impl AuroraGrid {
    /// Intensity at an exact grid point. A point missing from the grid reads
    /// as 0; no snapping to the nearest published point is attempted.
    pub fn intensity_at(&self, longitude: i32, latitude: i32) -> f64 {
        self.points
            .get(&(longitude, latitude))
            .copied()
            .unwrap_or(0.0)
    }

    /// Highest intensity anywhere on the grid (diagnostics only).
    pub fn max_intensity(&self) -> f64 {
        self.points.values().copied().fold(0.0, f64::max)
    }

    pub fn contains(&self, longitude: i32, latitude: i32) -> bool {
        self.points.contains_key(&(longitude, latitude))
    }
}

/// Most recent planetary K-index reading.
#[derive(Debug, Clone, PartialEq)]
pub struct KpReading {
    /// Time tag with the ISO `T` separator replaced by a space.
    pub time_tag: String,
    pub kp_index: f64,
    pub estimated_kp: Option<f64>,
    /// Raw fractional label (e.g. `"5M"`) when the feed provides it.
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by the monitor and its feed/notification adapters.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A feed or the push service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Connectivity {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    /// A feed answered successfully but the payload lacked required content.
    #[error("data integrity: {0}")]
    DataIntegrity(String),

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Clock(#[from] ClockError),
}

impl MonitorError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, MonitorError::Connectivity { .. } | MonitorError::Http(_))
    }
}
