//! Relative vorticity (component V): 4th-order centred finite differences
//! on the 850 hPa wind field.

use rayon::prelude::*;

use crate::fields::{Field2D, Field3D};
use crate::geometry::GeometryTable;
use crate::stencil::within_margin;

/// Valid-stencil margin (cells from each edge), per the source's literal
/// `3 ≤ i ≤ nlon−3` bound.
const MARGIN: usize = 3;

/// Compute `∂v/∂x − ∂u/∂y` at `k850` for every cell, zero outside the
/// valid stencil. Parallel over rows.
pub fn compute_vorticity(u: &Field3D, v: &Field3D, k850: usize, geometry: &GeometryTable) -> Field2D {
    let nlon = u.nlon();
    let nlat = u.nlat();
    let mut out = vec![0.0; nlon * nlat];

    out.par_chunks_mut(nlon).enumerate().for_each(|(j, row)| {
        if !within_margin(j, nlat, MARGIN) {
            return;
        }
        for (i, cell) in row.iter_mut().enumerate() {
            if !within_margin(i, nlon, MARGIN) {
                continue;
            }
            let dx = geometry.dx(i, j);
            let dy = geometry.dy(i, j);

            let dvdx = (2.0 / 3.0) * (v.get(i + 1, j, k850) - v.get(i - 1, j, k850)) / dx
                - (1.0 / 12.0) * (v.get(i + 2, j, k850) - v.get(i - 2, j, k850)) / dx;
            let dudy = (2.0 / 3.0) * (u.get(i, j + 1, k850) - u.get(i, j - 1, k850)) / dy
                - (1.0 / 12.0) * (u.get(i, j + 2, k850) - u.get(i, j - 2, k850)) / dy;

            *cell = dvdx - dudy;
        }
    });

    Field2D::from_vec(nlon, nlat, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn uniform_geometry(nlon: usize, nlat: usize) -> GeometryTable {
        let lon: Vec<f64> = (0..nlon).map(|i| i as f64).collect();
        let lat: Vec<f64> = (0..nlat).map(|j| j as f64 - (nlat as f64) / 2.0).collect();
        let level = vec![1000.0, 850.0, 700.0, 500.0, 300.0];
        let grid = Grid::new(lon, lat, level).unwrap();
        GeometryTable::build(&grid, 300_000.0).unwrap()
    }

    #[test]
    fn uniform_flow_has_zero_vorticity() {
        let nlon = 12;
        let nlat = 12;
        let nlevs = 5;
        let geometry = uniform_geometry(nlon, nlat);
        let u = Field3D::from_vec(nlon, nlat, nlevs, vec![1.0; nlon * nlat * nlevs]);
        let v = Field3D::from_vec(nlon, nlat, nlevs, vec![2.0; nlon * nlat * nlevs]);
        let vort = compute_vorticity(&u, &v, 1, &geometry);
        for j in 3..nlat - 3 {
            for i in 3..nlon - 3 {
                assert!(vort.get(i, j).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn edges_outside_stencil_are_zero() {
        let nlon = 10;
        let nlat = 10;
        let nlevs = 5;
        let geometry = uniform_geometry(nlon, nlat);
        let u = Field3D::from_vec(nlon, nlat, nlevs, vec![3.0; nlon * nlat * nlevs]);
        let v = Field3D::from_vec(nlon, nlat, nlevs, vec![3.0; nlon * nlat * nlevs]);
        let vort = compute_vorticity(&u, &v, 1, &geometry);
        assert_eq!(vort.get(0, 0), 0.0);
        assert_eq!(vort.get(nlon - 1, nlat - 1), 0.0);
    }

    #[test]
    fn solid_body_rotation_is_cyclonic() {
        let nlon = 12;
        let nlat = 12;
        let nlevs = 5;
        let geometry = uniform_geometry(nlon, nlat);
        let mut u = vec![0.0; nlon * nlat * nlevs];
        let mut v = vec![0.0; nlon * nlat * nlevs];
        let cx = nlon as f64 / 2.0;
        let cy = nlat as f64 / 2.0;
        for j in 0..nlat {
            for i in 0..nlon {
                let dxc = i as f64 - cx;
                let dyc = j as f64 - cy;
                let idx3 = 1 * nlat * nlon + j * nlon + i;
                u[idx3] = -dyc;
                v[idx3] = dxc;
            }
        }
        let u = Field3D::from_vec(nlon, nlat, nlevs, u);
        let v = Field3D::from_vec(nlon, nlat, nlevs, v);
        let vort = compute_vorticity(&u, &v, 1, &geometry);
        assert!(vort.get(nlon / 2, nlat / 2) > 0.0);
    }
}
