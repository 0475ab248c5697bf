#![doc = "Area-weighted allocation between overlapping polygon partitions"]
mod allocate;
mod error;
mod geom;
mod intersect;
mod matrix;

pub mod io;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use geom::{Collection, Region, RegionKey, RegionSet};

#[doc(inline)]
pub use intersect::{
    compute_intersections, compute_intersections_with, ExtractOptions, FractionField,
    IntersectionRecord, IntersectionTable,
};

#[doc(inline)]
pub use matrix::{build_matrix, scale_matrix, AllocationMatrix, Axis, Labels, WeightVector};

#[doc(inline)]
pub use allocate::{
    allocate_subset_time_series, allocate_time_series, allocation_fraction, Observation, TimeSeries,
};
