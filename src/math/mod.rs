// src/math/mod.rs

pub mod error;
pub mod geodesy;
pub mod kinematics;

pub use error::{AnchorRole, MalformedTelemetry, OutOfRangeSeek, TrajectoryError, TrajectoryResult};
pub use geodesy::{destination_point, haversine_distance, initial_bearing, EARTH_RADIUS_M};
pub use kinematics::{flight_path_angle_deg, normalize_altitude, planar_displacement, total_speed};
