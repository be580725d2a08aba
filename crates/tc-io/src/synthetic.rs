//! In-memory synthetic field generator: uniform fields and Rankine-vortex
//! fields for tests and demos. Makes no claim to read real NetCDF/GRIB2
//! data — see [`crate`] docs.

use tc_core::{EngineError, Field2D, Field3D, FieldFrame, FieldReader, Result};

/// A [`FieldReader`] backed by fully materialised, in-memory frames.
pub struct SyntheticFieldReader {
    lon: Vec<f64>,
    lat: Vec<f64>,
    level: Vec<f64>,
    frames: Vec<FieldFrame>,
}

impl SyntheticFieldReader {
    /// Every cell, every time step identical: `t` (K), `pmsl` (Pa), `u10`
    /// (m/s), winds at rest.
    pub fn uniform(
        lon: Vec<f64>,
        lat: Vec<f64>,
        level: Vec<f64>,
        ntimes: usize,
        t_kelvin: f64,
        pmsl_pa: f64,
        u10_ms: f64,
    ) -> Self {
        let nlon = lon.len();
        let nlat = lat.len();
        let nlevs = level.len();
        let frame = FieldFrame {
            u: Field3D::from_vec(nlon, nlat, nlevs, vec![0.0; nlon * nlat * nlevs]),
            v: Field3D::from_vec(nlon, nlat, nlevs, vec![0.0; nlon * nlat * nlevs]),
            t: Field3D::from_vec(nlon, nlat, nlevs, vec![t_kelvin; nlon * nlat * nlevs]),
            pmsl: Field2D::from_vec(nlon, nlat, vec![pmsl_pa; nlon * nlat]),
            u10: Field2D::from_vec(nlon, nlat, vec![u10_ms; nlon * nlat]),
            zs: None,
            tsu: None,
        };
        Self {
            lon,
            lat,
            level,
            frames: vec![frame; ntimes],
        }
    }

    /// A single warm-core Rankine vortex centred at grid indices
    /// `(center_i, center_j)`, held static across `ntimes` steps. Assumes
    /// `level` contains the four privileged pressure levels.
    #[allow(clippy::too_many_arguments)]
    pub fn rankine_vortex(
        lon: Vec<f64>,
        lat: Vec<f64>,
        level: Vec<f64>,
        ntimes: usize,
        center_i: usize,
        center_j: usize,
        vmax_ms: f64,
        background_pmsl_pa: f64,
        pressure_depth_pa: f64,
        decay_cells: f64,
        background_t_kelvin: f64,
        k850: usize,
        k300: usize,
    ) -> Self {
        let nlon = lon.len();
        let nlat = lat.len();
        let nlevs = level.len();
        let mut u = vec![0.0; nlon * nlat * nlevs];
        let mut v = vec![0.0; nlon * nlat * nlevs];
        let mut t = vec![background_t_kelvin; nlon * nlat * nlevs];
        let mut pmsl = vec![background_pmsl_pa; nlon * nlat];
        let mut u10 = vec![0.0; nlon * nlat];

        for j in 0..nlat {
            for i in 0..nlon {
                let dx = i as i64 - center_i as i64;
                let dy = j as i64 - center_j as i64;
                let r = ((dx * dx + dy * dy) as f64).sqrt().max(1e-6);
                let speed850 = if r < 3.0 {
                    vmax_ms * r / 3.0
                } else {
                    vmax_ms * 3.0 / r
                };
                let speed300 = 0.2 * speed850;
                let ux850 = -speed850 * (dy as f64) / r;
                let vy850 = speed850 * (dx as f64) / r;
                let ux300 = -speed300 * (dy as f64) / r;
                let vy300 = speed300 * (dx as f64) / r;

                for k in 0..nlevs {
                    let idx3 = k * nlat * nlon + j * nlon + i;
                    if k == k300 {
                        u[idx3] = ux300;
                        v[idx3] = vy300;
                    } else {
                        u[idx3] = ux850;
                        v[idx3] = vy850;
                    }
                }

                pmsl[j * nlon + i] = background_pmsl_pa - pressure_depth_pa * (-r / decay_cells).exp();
                u10[j * nlon + i] = speed850;

                let idx300 = k300 * nlat * nlon + j * nlon + i;
                let idx850 = k850 * nlat * nlon + j * nlon + i;
                t[idx300] += 3.0 * (-r / decay_cells).exp();
                t[idx850] += 1.0 * (-r / decay_cells).exp();
            }
        }

        let frame = FieldFrame {
            u: Field3D::from_vec(nlon, nlat, nlevs, u),
            v: Field3D::from_vec(nlon, nlat, nlevs, v),
            t: Field3D::from_vec(nlon, nlat, nlevs, t),
            pmsl: Field2D::from_vec(nlon, nlat, pmsl),
            u10: Field2D::from_vec(nlon, nlat, u10),
            zs: None,
            tsu: None,
        };

        Self {
            lon,
            lat,
            level,
            frames: vec![frame; ntimes],
        }
    }
}

impl FieldReader for SyntheticFieldReader {
    fn dims(&self) -> (usize, usize, usize, usize) {
        (self.lon.len(), self.lat.len(), self.level.len(), self.frames.len())
    }

    fn lon(&self) -> &[f64] {
        &self.lon
    }

    fn lat(&self) -> &[f64] {
        &self.lat
    }

    fn level(&self) -> &[f64] {
        &self.level
    }

    fn read_2d(&self, name: &str, t: usize) -> Result<Field2D> {
        let frame = self
            .frames
            .get(t)
            .ok_or_else(|| EngineError::Io(format!("time index {t} out of range")))?;
        match name {
            "psl" => Ok(frame.pmsl.clone()),
            "u10" => Ok(frame.u10.clone()),
            "tsu" => frame
                .tsu
                .clone()
                .ok_or_else(|| EngineError::Io("tsu not supplied by this reader".to_string())),
            "zs" => frame
                .zs
                .clone()
                .ok_or_else(|| EngineError::Io("zs not supplied by this reader".to_string())),
            other => Err(EngineError::Io(format!("unknown 2D field '{other}'"))),
        }
    }

    fn read_3d(&self, name: &str, t: usize) -> Result<Field3D> {
        let frame = self
            .frames
            .get(t)
            .ok_or_else(|| EngineError::Io(format!("time index {t} out of range")))?;
        match name {
            "temp" => Ok(frame.t.clone()),
            "u" => Ok(frame.u.clone()),
            "v" => Ok(frame.v.clone()),
            other => Err(EngineError::Io(format!("unknown 3D field '{other}'"))),
        }
    }
}
