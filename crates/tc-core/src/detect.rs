//! Criterion evaluator (component C): the fixed-order cascade of cyclonic
//! tests applied at every candidate cell.

use tracing::trace;

use crate::boxes::strict_box_range;
use crate::config::Configuration;
use crate::error::{EngineError, Result};
use crate::fields::{DerivedFrame, FieldFrame};
use crate::geometry::GeometryTable;
use crate::grid::Grid;
use crate::ocs::compute_ocs;
use crate::relax::RelaxMask;
use crate::stencil::within_margin;

/// Hard cap on detections in a single step; exceeding it is fatal.
pub const NVMAX: usize = 1000;

/// Margin used by the bounds test (§4.4 step 5), matching V's stencil margin.
const BOUNDS_MARGIN: usize = 3;

/// MSLP must be below this to be considered a minimum candidate, Pa.
const PMIN_CEILING_PA: f64 = 100_500.0;

/// SST floor for the location test, K.
const LOCATION_SST_MIN_K: f64 = 299.15;

/// Topography ceiling for the location test, m.
const LOCATION_ELEV_MAX_M: f64 = 0.5;

/// A single detected vortex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub ips: usize,
    pub jps: usize,
    pub iwmax: usize,
    pub jwmax: usize,
    pub pmin: f64,
    pub vort_here: f64,
    pub wmax: f64,
    pub tsum: f64,
    pub tdiff: f64,
    pub ocs: f64,
}

/// Evaluate the full criterion cascade at `(i, j)`, returning a [`Detection`]
/// only if every test passes.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_cell(
    i: usize,
    j: usize,
    frame: &FieldFrame,
    derived: &DerivedFrame,
    grid: &Grid,
    geometry: &GeometryTable,
    relax: &RelaxMask,
    config: &Configuration,
) -> Option<Detection> {
    let nlon = grid.nlon();
    let nlat = grid.nlat();
    let k850 = grid.k850();
    let relaxed_here = relax.is_relaxed(i, j);

    if grid.lat()[j].abs() > 30.0 && !relaxed_here {
        return None;
    }

    let nxwidth = geometry.nxwidth(i, j);
    let nywidth = geometry.nywidth(i, j);
    let (wimin, wimax) = strict_box_range(i, nxwidth, nlon)?;
    let (wjmin, wjmax) = strict_box_range(j, nywidth, nlat)?;

    // 1. Vorticity.
    let vort_here = derived.vort.get(i, j);
    let vtest = if grid.is_southern(j) { -vort_here } else { vort_here };
    if !(vtest > config.vortcrit) {
        return None;
    }

    // 2. Pressure minimum.
    let mut psmin = f64::INFINITY;
    let mut ips = i;
    let mut jps = j;
    let mut found = false;
    for jj in wjmin..=wjmax {
        for ii in wimin..=wimax {
            let p = frame.pmsl.get(ii, jj);
            if p < PMIN_CEILING_PA && p < psmin {
                psmin = p;
                ips = ii;
                jps = jj;
                found = true;
            }
        }
    }
    if !found {
        return None;
    }
    for dj in -1i64..=1 {
        for di in -1i64..=1 {
            if di == 0 && dj == 0 {
                continue;
            }
            let ni = ips as i64 + di;
            let nj = jps as i64 + dj;
            if ni < 0 || nj < 0 || ni >= nlon as i64 || nj >= nlat as i64 {
                continue;
            }
            if frame.pmsl.get(ni as usize, nj as usize) < psmin {
                return None;
            }
        }
    }

    // 3. Rotation.
    if jps < 2 || jps + 2 >= nlat || ips < 2 || ips + 2 >= nlon {
        return None;
    }
    let u_minus = frame.u.get(ips, jps - 2, k850);
    let u_plus = frame.u.get(ips, jps + 2, k850);
    if !opposite_signs(u_minus, u_plus) {
        return None;
    }
    let v_minus = frame.v.get(ips - 2, jps, k850);
    let v_plus = frame.v.get(ips + 2, jps, k850);
    if !opposite_signs(v_minus, v_plus) {
        return None;
    }

    // 4. MSLP anomaly.
    if !(derived.pmslanom.get(ips, jps) <= -config.pmslcrit * 100.0) {
        return None;
    }

    // 5. Bounds.
    if !within_margin(ips, nlon, BOUNDS_MARGIN) || !within_margin(jps, nlat, BOUNDS_MARGIN) {
        return None;
    }

    // 6. Max wind.
    let (bwimin, bwimax) = strict_box_range(ips, nxwidth, nlon)?;
    let (bwjmin, bwjmax) = strict_box_range(jps, nywidth, nlat)?;
    let mut wmax = f64::NEG_INFINITY;
    let mut iwmax = ips;
    let mut jwmax = jps;
    for jj in bwjmin..=bwjmax {
        for ii in bwimin..=bwimax {
            let w = frame.u10.get(ii, jj);
            if w > wmax {
                wmax = w;
                iwmax = ii;
                jwmax = jj;
            }
        }
    }
    let wspthresh = if relaxed_here {
        config.wspcrit * config.relax_wind_factor
    } else {
        config.wspcrit
    };
    if !(wmax >= wspthresh) {
        return None;
    }

    // 7. Location.
    if config.location_check && !relaxed_here {
        let tsu = frame.tsu.as_ref().map(|f| f.get(ips, jps));
        let zs = frame.zs.as_ref().map(|f| f.get(ips, jps));
        match (tsu, zs) {
            (Some(tsu), Some(zs)) => {
                if !(tsu >= LOCATION_SST_MIN_K && zs <= LOCATION_ELEV_MAX_M) {
                    return None;
                }
            }
            _ => {}
        }
    }

    // 8. Warm core sum.
    let tsum = derived.tanomsum.get(ips, jps);
    if !(tsum > config.tcrit || relaxed_here) {
        return None;
    }

    // 9. Upper warm anomaly.
    let tanom300 = derived.tanom300.get(ips, jps);
    let ttest = if config.t300flag {
        derived.tanom850.get(ips, jps)
    } else {
        config.t300crit
    };
    if !(tanom300 >= ttest || relaxed_here) {
        return None;
    }

    // 10. Shear.
    let tdiff = derived.tanomdiff.get(ips, jps);
    if !(derived.wspdchek.get(ips, jps) >= config.wchkcrit || relaxed_here) {
        return None;
    }

    // 11. OCS.
    let ocs = compute_ocs(&frame.u, &frame.v, &frame.u10, k850, ips, jps, grid.is_southern(jps));
    if !(ocs >= config.ocscrit || relaxed_here) {
        return None;
    }

    // Refine wmax with an enlarged, longitude-wrapping box.
    let rnx = nxwidth + 1;
    let rny = nywidth + 1;
    for dj in -rny..=rny {
        let jraw = jps as i64 + dj;
        if jraw < 0 || jraw >= nlat as i64 {
            continue;
        }
        let jr = jraw as usize;
        for di in -rnx..=rnx {
            let iraw = ips as i64 + di;
            let ir = iraw.rem_euclid(nlon as i64) as usize;
            let w = frame.u10.get(ir, jr);
            if w > wmax {
                wmax = w;
                iwmax = ir;
                jwmax = jr;
            }
        }
    }

    if config.debug && i == config.id && j == config.jd {
        trace!(i, j, ips, jps, psmin, vort_here, wmax, tsum, tdiff, ocs, "candidate detection");
    }

    Some(Detection {
        ips,
        jps,
        iwmax,
        jwmax,
        pmin: psmin,
        vort_here,
        wmax,
        tsum,
        tdiff,
        ocs,
    })
}

fn opposite_signs(a: f64, b: f64) -> bool {
    (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0)
}

/// Serial scan over every cell in row-major `(j, i)` order, per §5 — this
/// keeps the emitted list in the canonical order the deduplicator depends
/// on. Adjacent-cell duplicates (within ±1 grid point of an already-kept
/// detection) are suppressed as they're found.
pub fn run_criterion_pass(
    frame: &FieldFrame,
    derived: &DerivedFrame,
    grid: &Grid,
    geometry: &GeometryTable,
    relax: &RelaxMask,
    config: &Configuration,
) -> Result<Vec<Detection>> {
    let mut detections = Vec::new();
    for j in 0..grid.nlat() {
        for i in 0..grid.nlon() {
            let Some(det) = evaluate_cell(i, j, frame, derived, grid, geometry, relax, config) else {
                continue;
            };
            if detections
                .iter()
                .any(|d: &Detection| d.ips.abs_diff(det.ips) <= 1 && d.jps.abs_diff(det.jps) <= 1)
            {
                continue;
            }
            if detections.len() >= NVMAX {
                return Err(EngineError::Capacity {
                    count: detections.len() + 1,
                    nvmax: NVMAX,
                });
            }
            detections.push(det);
        }
    }
    Ok(detections)
}
