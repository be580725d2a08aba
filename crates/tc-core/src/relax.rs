//! Relaxation mask (component R): marks neighbourhoods of the previous
//! step's detections so the criterion evaluator can soften its thresholds.

use crate::detect::Detection;
use crate::geometry::GeometryTable;

/// Boolean `nlon × nlat` relaxation mask.
#[derive(Debug, Clone)]
pub struct RelaxMask {
    nlon: usize,
    nlat: usize,
    bits: Vec<bool>,
}

impl RelaxMask {
    /// All-false mask of the given shape (fresh-start initialisation).
    pub fn new(nlon: usize, nlat: usize) -> Self {
        Self {
            nlon,
            nlat,
            bits: vec![false; nlon * nlat],
        }
    }

    pub fn nlon(&self) -> usize {
        self.nlon
    }

    pub fn nlat(&self) -> usize {
        self.nlat
    }

    #[inline]
    pub fn is_relaxed(&self, i: usize, j: usize) -> bool {
        self.bits[j * self.nlon + i]
    }

    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn from_bits(nlon: usize, nlat: usize, bits: Vec<bool>) -> Self {
        assert_eq!(bits.len(), nlon * nlat, "RelaxMask bits length mismatch");
        Self { nlon, nlat, bits }
    }

    /// Build the mask for step `k+1` from step `k`'s live detections.
    ///
    /// Per §4.7 the half-widths used are those of the *candidate* cell
    /// `(a,b)`, not the detection cell — checking every cell against every
    /// detection directly is O(cells × detections); instead we bound the
    /// search to a neighbourhood around each detection sized by the widest
    /// half-width anywhere in the table, then verify the exact per-cell
    /// condition only within that neighbourhood.
    pub fn update(detections: &[Detection], geometry: &GeometryTable, nlon: usize, nlat: usize) -> Self {
        let mut mask = Self::new(nlon, nlat);
        if detections.is_empty() {
            return mask;
        }

        let mut max_nxwidth: i64 = 0;
        let mut max_nywidth: i64 = 0;
        for j in 0..nlat {
            for i in 0..nlon {
                max_nxwidth = max_nxwidth.max(geometry.nxwidth(i, j));
                max_nywidth = max_nywidth.max(geometry.nywidth(i, j));
            }
        }

        for det in detections {
            let ips = det.ips as i64;
            let jps = det.jps as i64;
            let amin = (ips - max_nxwidth).max(0) as usize;
            let amax = (ips + max_nxwidth).min(nlon as i64 - 1) as usize;
            let bmin = (jps - max_nywidth).max(0) as usize;
            let bmax = (jps + max_nywidth).min(nlat as i64 - 1) as usize;

            for b in bmin..=bmax {
                for a in amin..=amax {
                    if mask.is_relaxed(a, b) {
                        continue;
                    }
                    let nxwidth = geometry.nxwidth(a, b);
                    let nywidth = geometry.nywidth(a, b);
                    let da = (a as i64 - ips).abs();
                    let db = (b as i64 - jps).abs();
                    if da <= nxwidth && db <= nywidth {
                        mask.bits[b * nlon + a] = true;
                    }
                }
            }
        }

        mask
    }
}
