/// Space-weather feed ingestion.
///
/// Submodules:
/// - `swpc` - NOAA SWPC OVATION aurora map and planetary K-index
/// - `fixtures` (test only) - representative feed payloads

pub mod swpc;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::model::{AuroraGrid, KpReading, MonitorError};

/// Where the monitor gets its readings from.
pub trait DataSource {
    /// Latest aurora intensity grid.
    fn aurora_grid(&self) -> Result<AuroraGrid, MonitorError>;

    /// Most recent planetary K-index reading.
    fn latest_kp(&self) -> Result<KpReading, MonitorError>;
}

impl<T: DataSource + ?Sized> DataSource for std::rc::Rc<T> {
    fn aurora_grid(&self) -> Result<AuroraGrid, MonitorError> {
        (**self).aurora_grid()
    }

    fn latest_kp(&self) -> Result<KpReading, MonitorError> {
        (**self).latest_kp()
    }
}
