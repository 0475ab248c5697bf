mod axis;
mod build;
mod labels;
mod matrix;
mod scale;

pub use axis::Axis;
pub use build::build_matrix;
pub use labels::Labels;
pub use matrix::AllocationMatrix;
pub use scale::{scale_matrix, WeightVector};
