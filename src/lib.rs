/// auromon_service: aurora and geomagnetic activity push notifier.
///
/// # Module structure
///
/// ```text
/// auromon_service
/// ├── model       - shared data types (AuroraGrid, KpReading, MonitorError)
/// ├── config      - auromon.toml loader + environment credentials
/// ├── clock       - cooperative timer registry driving the monitor loop
/// ├── levels      - per-language threshold tables and crossing evaluation
/// ├── notify      - Pushover push notification delivery
/// ├── ingest
/// │   ├── swpc    - NOAA SWPC OVATION aurora + planetary K-index feeds
/// │   └── fixtures (test only) - representative feed payloads
/// └── monitor     - check/reset state machine, day/night reset cadence
///     └── daylight - daytime window
/// ```

pub mod clock;
pub mod config;
pub mod ingest;
pub mod levels;
pub mod model;
pub mod monitor;
pub mod notify;
