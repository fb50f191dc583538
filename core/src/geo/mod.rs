pub mod bounds;
pub mod coords;

pub use bounds::BoundingBox;
pub use coords::{coerce_coordinate, latitude_in_range, longitude_in_range};
