use crate::dynamics::state::G0;

/// Specific impulse estimate from a thrust curve, s.
///
/// Assumes the curve burns exactly `propellant_mass`:
/// `Isp = total_impulse / (propellant_mass * g0)`.
pub fn specific_impulse(total_impulse: f64, propellant_mass: f64) -> f64 {
    total_impulse / (propellant_mass * G0)
}

/// Propellant mass flow rate: mdot = F / (Isp * g0), kg/s.
/// Zero without thrust or without a usable Isp.
pub fn mass_flow(thrust: f64, isp: f64) -> f64 {
    if thrust > 0.0 && isp > 0.0 {
        thrust / (isp * G0)
    } else {
        0.0
    }
}
