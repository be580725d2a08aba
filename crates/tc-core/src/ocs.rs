//! Okubo-like Circulation Strength (component O): weighted tangential-wind
//! integral on a 5×5 stencil around a candidate pressure centre.

use crate::fields::{Field2D, Field3D};

/// Stencil weights, row `Δi+2`, column `Δj+2`; centre is unused.
const WEIGHTS: [[f64; 5]; 5] = [
    [0.000, 0.031, 0.055, 0.031, 0.000],
    [0.030, 0.078, 0.056, 0.078, 0.030],
    [0.053, 0.057, 0.000, 0.057, 0.053],
    [0.030, 0.078, 0.056, 0.078, 0.030],
    [0.000, 0.031, 0.055, 0.031, 0.000],
];

/// Compute OCS at `(ips, jps)`. The stencil is assumed to lie entirely
/// inside the grid; callers only invoke O after the bounds test (§4.4
/// step 5) has already guaranteed this.
pub fn compute_ocs(
    u: &Field3D,
    v: &Field3D,
    u10: &Field2D,
    k850: usize,
    ips: usize,
    jps: usize,
    southern_hemisphere: bool,
) -> f64 {
    let mut ocs = 0.0;
    for dj in -2i64..=2 {
        for di in -2i64..=2 {
            if di == 0 && dj == 0 {
                continue;
            }
            let i = (ips as i64 + di) as usize;
            let j = (jps as i64 + dj) as usize;

            let dist = ((di * di + dj * dj) as f64).sqrt();
            let costheta = di as f64 / dist;
            let sintheta = dj as f64 / dist;

            let u850 = u.get(i, j, k850);
            let v850 = v.get(i, j, k850);
            let umag850 = (u850 * u850 + v850 * v850).sqrt();
            let ratio = if umag850 == 0.0 {
                0.0
            } else {
                u10.get(i, j) / umag850
            };

            let utan = ratio * (u850 * sintheta - v850 * costheta)
                * WEIGHTS[(di + 2) as usize][(dj + 2) as usize];

            if southern_hemisphere {
                ocs += utan;
            } else {
                ocs -= utan;
            }
        }
    }
    ocs
}
