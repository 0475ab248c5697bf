mod bbox;
mod region;

use bbox::BoundingBox;
pub use region::{Collection, Region, RegionKey, RegionSet};
