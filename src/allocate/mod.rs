mod fraction;
mod series;

pub use fraction::allocation_fraction;
pub use series::{allocate_subset_time_series, allocate_time_series, Observation, TimeSeries};
