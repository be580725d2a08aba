//! Mean fields and anomalies (component A): per-cell box means of
//! temperature, wind speed and MSLP, and the anomalies derived from them.

use rayon::prelude::*;
use tracing::warn;

use crate::boxes::sliding_clamp_range;
use crate::error::{EngineError, Result};
use crate::fields::{DerivedFrame, FieldFrame};
use crate::geometry::GeometryTable;
use crate::grid::Grid;

struct LevelIndices {
    k850: usize,
    k700: usize,
    k500: usize,
    k300: usize,
}

/// Recompute every field in `out` from `frame`, leaving a cell's prior
/// value in place wherever its box mean has a zero denominator (§4.3).
///
/// A box mean that comes out NaN/Inf despite a non-zero denominator (a
/// non-finite value somewhere in `frame`) is fatal: returns
/// [`EngineError::Numeric`] rather than silently propagating the NaN into
/// the criterion cascade.
pub fn compute_anomalies(
    frame: &FieldFrame,
    grid: &Grid,
    geometry: &GeometryTable,
    out: &mut DerivedFrame,
) -> Result<()> {
    let nlon = grid.nlon();
    let nlat = grid.nlat();
    let levels = LevelIndices {
        k850: grid.k850(),
        k700: grid.k700(),
        k500: grid.k500(),
        k300: grid.k300(),
    };

    let rows: Vec<usize> = (0..nlat).collect();
    let results: Vec<_> = rows
        .par_iter()
        .map(|&j| {
            let mut row_t850 = vec![0.0; nlon];
            let mut row_t300 = vec![0.0; nlon];
            let mut row_tdiff = vec![0.0; nlon];
            let mut row_tsum = vec![0.0; nlon];
            let mut row_wspd = vec![0.0; nlon];
            let mut row_pmsl = vec![0.0; nlon];
            let mut row_ok = vec![false; nlon];

            for i in 0..nlon {
                let nxt = geometry.nxtwidth(i, j);
                let nyt = geometry.nytwidth(i, j);
                let (imin, imax) = sliding_clamp_range(i, nxt, nlon);
                let (jmin, jmax) = sliding_clamp_range(j, nyt, nlat);
                let tcount = ((imax - imin + 1) * (jmax - jmin + 1)) as f64;

                let nxw = geometry.nxwidth(i, j);
                let nyw = geometry.nywidth(i, j);
                let (wimin, wimax) = sliding_clamp_range(i, nxw, nlon);
                let (wjmin, wjmax) = sliding_clamp_range(j, nyw, nlat);
                let wcount = ((wimax - wimin + 1) * (wjmax - wjmin + 1)) as f64;

                if tcount == 0.0 || wcount == 0.0 {
                    row_ok[i] = false;
                    continue;
                }

                let mut sum850 = 0.0;
                let mut sum700 = 0.0;
                let mut sum500 = 0.0;
                let mut sum300 = 0.0;
                for jj in jmin..=jmax {
                    for ii in imin..=imax {
                        sum850 += frame.t.get(ii, jj, levels.k850);
                        sum700 += frame.t.get(ii, jj, levels.k700);
                        sum500 += frame.t.get(ii, jj, levels.k500);
                        sum300 += frame.t.get(ii, jj, levels.k300);
                    }
                }
                let mean850 = sum850 / tcount;
                let mean700 = sum700 / tcount;
                let mean500 = sum500 / tcount;
                let mean300 = sum300 / tcount;

                let a850 = frame.t.get(i, j, levels.k850) - mean850;
                let a700 = frame.t.get(i, j, levels.k700) - mean700;
                let a500 = frame.t.get(i, j, levels.k500) - mean500;
                let a300 = frame.t.get(i, j, levels.k300) - mean300;

                let mut sum_wspd850 = 0.0;
                let mut sum_wspd300 = 0.0;
                let mut sum_pmsl = 0.0;
                for jj in wjmin..=wjmax {
                    for ii in wimin..=wimax {
                        let u850 = frame.u.get(ii, jj, levels.k850);
                        let v850 = frame.v.get(ii, jj, levels.k850);
                        sum_wspd850 += (u850 * u850 + v850 * v850).sqrt();
                        let u300 = frame.u.get(ii, jj, levels.k300);
                        let v300 = frame.v.get(ii, jj, levels.k300);
                        sum_wspd300 += (u300 * u300 + v300 * v300).sqrt();
                        sum_pmsl += frame.pmsl.get(ii, jj);
                    }
                }
                let mean_wspd850 = sum_wspd850 / wcount;
                let mean_wspd300 = sum_wspd300 / wcount;
                let mean_pmsl = sum_pmsl / wcount;

                row_t850[i] = a850;
                row_t300[i] = a300;
                row_tdiff[i] = a300 - a850;
                row_tsum[i] = a700 + a500 + a300;
                row_wspd[i] = mean_wspd850 - mean_wspd300;
                row_pmsl[i] = frame.pmsl.get(i, j) - mean_pmsl;
                row_ok[i] = true;

                if row_ok[i]
                    && !(row_t850[i].is_finite()
                        && row_t300[i].is_finite()
                        && row_tdiff[i].is_finite()
                        && row_tsum[i].is_finite()
                        && row_wspd[i].is_finite()
                        && row_pmsl[i].is_finite())
                {
                    return Err(EngineError::Numeric {
                        i,
                        j,
                        detail: "non-finite box mean".to_string(),
                    });
                }
            }

            Ok((row_t850, row_t300, row_tdiff, row_tsum, row_wspd, row_pmsl, row_ok))
        })
        .collect();

    for (j, row) in results.into_iter().enumerate() {
        let (row_t850, row_t300, row_tdiff, row_tsum, row_wspd, row_pmsl, row_ok) = row?;
        for i in 0..nlon {
            if !row_ok[i] {
                warn!(i, j, "degenerate box mean at cell, retaining prior value");
                continue;
            }
            out.tanom850.set(i, j, row_t850[i]);
            out.tanom300.set(i, j, row_t300[i]);
            out.tanomdiff.set(i, j, row_tdiff[i]);
            out.tanomsum.set(i, j, row_tsum[i]);
            out.wspdchek.set(i, j, row_wspd[i]);
            out.pmslanom.set(i, j, row_pmsl[i]);
        }
    }

    Ok(())
}
