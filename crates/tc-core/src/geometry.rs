//! Grid-geometry precomputation (component G): per-cell search half-widths
//! and metric spacings.

use crate::error::{EngineError, Result};
use crate::grid::Grid;

/// Mean Earth radius, m.
const R_EARTH: f64 = 6.371_22e6;

/// Per-cell search half-widths (grid points) and metric spacings (m).
///
/// Computed once at startup from [`Grid`] and `radius`; never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct GeometryTable {
    nlon: usize,
    nlat: usize,
    nxwidth: Vec<i64>,
    nywidth: Vec<i64>,
    nxtwidth: Vec<i64>,
    nytwidth: Vec<i64>,
    dx: Vec<f64>,
    dy: Vec<f64>,
}

#[inline]
fn round_up_to_even(value: f64) -> i64 {
    let rounded = value.round() as i64;
    if rounded % 2 != 0 {
        rounded + 1
    } else {
        rounded
    }
}

impl GeometryTable {
    /// Build the table for `grid` with physical search `radius` (m).
    ///
    /// Interior cells use centred differences on the coordinate vectors;
    /// boundary rows/columns copy their nearest interior neighbour.
    pub fn build(grid: &Grid, radius: f64) -> Result<Self> {
        let nlon = grid.nlon();
        let nlat = grid.nlat();
        let mut dx = vec![0.0; nlon * nlat];
        let mut dy = vec![0.0; nlon * nlat];
        let mut nxwidth = vec![0i64; nlon * nlat];
        let mut nywidth = vec![0i64; nlon * nlat];

        let idx = |i: usize, j: usize| j * nlon + i;

        for j in 1..nlat.saturating_sub(1) {
            let lat_rad = grid.lat()[j].to_radians();
            let dlat = 0.5 * (grid.lat()[j + 1] - grid.lat()[j - 1]).to_radians();
            let cell_dy = R_EARTH * dlat;
            for i in 1..nlon.saturating_sub(1) {
                let dlon = 0.5 * (grid.lon()[i + 1] - grid.lon()[i - 1]).to_radians();
                let cell_dx = R_EARTH * lat_rad.cos() * dlon;
                if !cell_dx.is_finite() || cell_dx <= 0.0 || !cell_dy.is_finite() || cell_dy <= 0.0 {
                    return Err(EngineError::Geometry(format!(
                        "degenerate spacing at ({i}, {j}): dx={cell_dx}, dy={cell_dy}"
                    )));
                }
                let k = idx(i, j);
                dx[k] = cell_dx;
                dy[k] = cell_dy;
                nxwidth[k] = round_up_to_even(radius / cell_dx);
                nywidth[k] = round_up_to_even(radius / cell_dy);
            }
        }

        if nlat >= 3 && nlon >= 3 {
            copy_boundary_rows(&mut dx, nlon, nlat);
            copy_boundary_rows(&mut dy, nlon, nlat);
            copy_boundary_rows_i64(&mut nxwidth, nlon, nlat);
            copy_boundary_rows_i64(&mut nywidth, nlon, nlat);
            copy_boundary_cols(&mut dx, nlon, nlat);
            copy_boundary_cols(&mut dy, nlon, nlat);
            copy_boundary_cols_i64(&mut nxwidth, nlon, nlat);
            copy_boundary_cols_i64(&mut nywidth, nlon, nlat);
        }

        let nxtwidth: Vec<i64> = nxwidth.iter().map(|w| 2 * w).collect();
        let nytwidth = nxwidth.clone();

        Ok(Self {
            nlon,
            nlat,
            nxwidth,
            nywidth,
            nxtwidth,
            nytwidth,
            dx,
            dy,
        })
    }

    #[inline]
    fn idx(&self, i: usize, j: usize) -> usize {
        j * self.nlon + i
    }

    pub fn nxwidth(&self, i: usize, j: usize) -> i64 {
        self.nxwidth[self.idx(i, j)]
    }

    pub fn nywidth(&self, i: usize, j: usize) -> i64 {
        self.nywidth[self.idx(i, j)]
    }

    pub fn nxtwidth(&self, i: usize, j: usize) -> i64 {
        self.nxtwidth[self.idx(i, j)]
    }

    pub fn nytwidth(&self, i: usize, j: usize) -> i64 {
        self.nytwidth[self.idx(i, j)]
    }

    pub fn dx(&self, i: usize, j: usize) -> f64 {
        self.dx[self.idx(i, j)]
    }

    pub fn dy(&self, i: usize, j: usize) -> f64 {
        self.dy[self.idx(i, j)]
    }
}

fn copy_boundary_rows(field: &mut [f64], nlon: usize, nlat: usize) {
    for i in 0..nlon {
        let src = 1 * nlon + i;
        field[i] = field[src];
        let last = nlat - 1;
        let src_last = (last - 1) * nlon + i;
        field[last * nlon + i] = field[src_last];
    }
}

fn copy_boundary_cols(field: &mut [f64], nlon: usize, nlat: usize) {
    for j in 0..nlat {
        let row = j * nlon;
        field[row] = field[row + 1];
        field[row + nlon - 1] = field[row + nlon - 2];
    }
}

fn copy_boundary_rows_i64(field: &mut [i64], nlon: usize, nlat: usize) {
    for i in 0..nlon {
        let src = nlon + i;
        field[i] = field[src];
        let last = nlat - 1;
        let src_last = (last - 1) * nlon + i;
        field[last * nlon + i] = field[src_last];
    }
}

fn copy_boundary_cols_i64(field: &mut [i64], nlon: usize, nlat: usize) {
    for j in 0..nlat {
        let row = j * nlon;
        field[row] = field[row + 1];
        field[row + nlon - 1] = field[row + nlon - 2];
    }
}
