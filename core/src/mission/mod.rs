pub mod document;
pub mod params;
pub mod record;

pub use document::{
    CollectionKind, Feature, FeatureKind, FeatureProperties, Geometry, GeometryKind,
    MissionDocument, MissionMetadata, Position, Waypoint,
};
pub use params::MissionParameters;
pub use record::{PointMetadata, RawRecord, RejectionRecord, ValidatedPoint};
