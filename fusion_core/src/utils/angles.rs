// fusion_core/src/utils/angles.rs

use std::f64::consts::{PI, TAU};

/// Wraps an angle (or an angle difference) into `(-PI, PI]`.
///
/// Values already inside the interval are returned untouched, so the
/// operation is exactly idempotent.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    // rem_euclid lands in [0, TAU); mirror it so -PI maps to +PI.
    let wrapped = PI - (PI - angle).rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs.
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}
