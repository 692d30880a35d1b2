use crate::dynamics::state::LaunchConditions;

/// Wind speed that gives the maximum recommended tilt, m/s.
const FULL_TILT_WIND: f64 = 10.0;
/// Largest recommended rail tilt, deg.
const MAX_TILT_DEG: f64 = 5.0;

impl LaunchConditions {
    /// Wind velocity component along the downrange axis, m/s.
    pub fn wind_downrange(&self) -> f64 {
        self.wind_speed * self.wind_direction_deg.to_radians().cos()
    }

    /// Thrust direction as (downrange, up) factors.
    pub fn thrust_axis(&self) -> (f64, f64) {
        let a = self.angle_deg.to_radians();
        (a.sin(), a.cos())
    }
}

/// Suggested rail tilt into the wind, deg.
///
/// Magnitude grows 0.5 deg per m/s up to 5 deg; the sign follows
/// `-cos(direction)` and is zero when the wind is mostly crosswise.
pub fn recommended_launch_angle(wind_speed: f64, wind_direction_deg: f64) -> f64 {
    let magnitude = (MAX_TILT_DEG / FULL_TILT_WIND * wind_speed).clamp(0.0, MAX_TILT_DEG);
    let lean = -wind_direction_deg.to_radians().cos();
    let sign = if lean > 0.2 {
        1.0
    } else if lean < -0.2 {
        -1.0
    } else {
        0.0
    };
    magnitude * sign
}
