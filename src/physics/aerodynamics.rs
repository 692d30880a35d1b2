use crate::dynamics::state::RocketParameters;

/// Sign of `v` with zero mapped to zero (`f64::signum` maps 0.0 to 1.0).
pub fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Quadratic drag magnitude: 0.5 * rho * v^2 * Cd * A, N.
pub fn drag_force(speed: f64, rho: f64, cd: f64, area: f64) -> f64 {
    0.5 * rho * speed * speed * cd * area
}

/// Drag coefficient and reference area in effect for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProfile {
    pub cd: f64,
    pub area: f64,
}

impl DragProfile {
    pub fn force(&self, speed: f64, rho: f64) -> f64 {
        drag_force(speed, rho, self.cd, self.area)
    }
}

/// Blend body and parachute drag according to deployment progress.
///
/// Before deployment (`deploy_started_at == None`) the body values apply.
/// Inside `[start, start + ramp)` Cd and A move linearly toward the canopy
/// values; from `start + ramp` on the canopy values apply.
pub fn effective_drag(
    rocket: &RocketParameters,
    deploy_started_at: Option<f64>,
    ramp: f64,
    time: f64,
) -> DragProfile {
    let body = DragProfile { cd: rocket.cd, area: rocket.area };
    let Some(start) = deploy_started_at else {
        return body;
    };
    let chute = DragProfile { cd: rocket.chute_cd(), area: rocket.chute_area() };
    let end = start + ramp;

    if time >= end {
        chute
    } else if time >= start {
        let frac = (time - start) / (end - start);
        DragProfile {
            cd: body.cd + frac * (chute.cd - body.cd),
            area: body.area + frac * (chute.area - body.area),
        }
    } else {
        body
    }
}
