//! Conversion core for the drone mission adapter.
//!
//! Turns a JSON list of geotagged risk records into a GeoJSON waypoint
//! mission. The pipeline is pure and synchronous: decoding, per-record
//! validation, waypoint building and document assembly, in that order.

pub mod geo;
pub mod mission;
pub mod pipeline;
pub mod prelude;
pub mod telemetry;

pub use mission::{MissionDocument, MissionParameters, RejectionRecord, Waypoint};
pub use pipeline::{convert, Conversion};
pub use prelude::{ErrorKind, RunError, RunResult, Stage};
