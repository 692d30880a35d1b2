pub mod parse;
pub mod thrust_curve;

pub use parse::{load_file, CurveFormat};
pub use thrust_curve::{ThrustCurve, ThrustSample};
