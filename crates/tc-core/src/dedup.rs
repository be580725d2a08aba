//! Deduplicator (component D): pairwise merging of vortices whose centres
//! fall within each other's search boxes.

use crate::config::Configuration;
use crate::detect::Detection;
use crate::geometry::GeometryTable;

/// Merge `detections` in place, keeping only the strongest vortex in each
/// overlapping cluster (§4.6). The comparison vorticity is signed by
/// default — reproducing the source's behaviour where Southern-Hemisphere
/// vortices are always judged weaker than Northern-Hemisphere ones — or
/// `|vort_here|` when `dedup_abs_vorticity` is set.
pub fn deduplicate(detections: Vec<Detection>, geometry: &GeometryTable, config: &Configuration) -> Vec<Detection> {
    let mut alive: Vec<Detection> = detections;
    let mut dead = vec![false; alive.len()];

    for j in 0..alive.len() {
        if dead[j] {
            continue;
        }
        for i in (j + 1)..alive.len() {
            if dead[i] {
                continue;
            }
            let jcentre = alive[j];
            let candidate = alive[i];
            let nxwidth = geometry.nxwidth(jcentre.ips, jcentre.jps);
            let nywidth = geometry.nywidth(jcentre.ips, jcentre.jps);
            let within_box = (candidate.ips as i64 - jcentre.ips as i64).abs() <= nxwidth
                && (candidate.jps as i64 - jcentre.jps as i64).abs() <= nywidth;
            if !within_box {
                continue;
            }

            let vj = compare_value(jcentre.vort_here, config);
            let vi = compare_value(candidate.vort_here, config);
            if vi < vj {
                dead[i] = true;
            } else {
                alive[j] = candidate;
                dead[i] = true;
            }
        }
    }

    alive
        .into_iter()
        .zip(dead)
        .filter_map(|(det, is_dead)| if is_dead { None } else { Some(det) })
        .collect()
}

#[inline]
fn compare_value(vort_here: f64, config: &Configuration) -> f64 {
    if config.dedup_abs_vorticity {
        vort_here.abs()
    } else {
        vort_here
    }
}
