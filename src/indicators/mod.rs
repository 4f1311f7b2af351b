pub mod error;
pub mod resample;
pub mod snapshot;

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use error::IndicatorError;
pub use resample::resample_weekly;
pub use snapshot::{compute_snapshot, MIN_CANDLES};
