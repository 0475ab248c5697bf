pub mod allocate;
pub mod intersect;
pub mod matrix;
