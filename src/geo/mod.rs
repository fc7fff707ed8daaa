//! Pure geometry over raw GPS coordinates
//!
//! Everything here is a stateless function of its inputs. The collision
//! engine, the claim validator, and the area computation all share these
//! primitives, and all of them operate on raw WGS-84 degrees — the display
//! datum transform used for drawing never enters this math.

mod area;
mod primitives;
mod self_intersection;

pub use area::ring_area_m2;
pub use primitives::{distance_m, point_in_polygon, segments_properly_intersect, Orientation};
pub use self_intersection::is_self_intersecting;

/// Mean Earth radius in meters, shared by the distance and area math
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
