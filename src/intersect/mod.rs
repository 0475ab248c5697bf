mod extract;
mod table;

pub use extract::{compute_intersections, compute_intersections_with, ExtractOptions};
pub use table::{FractionField, IntersectionRecord, IntersectionTable};
