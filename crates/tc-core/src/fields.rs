//! Flat 2D/3D field storage and the per-step frames built from it.

/// A dense `nlat × nlon` field, indexed `(j, i)` with `j` the latitude
/// index and `i` the longitude index (row-major, `j` outer).
#[derive(Debug, Clone)]
pub struct Field2D {
    nlon: usize,
    nlat: usize,
    data: Vec<f64>,
}

impl Field2D {
    pub fn zeros(nlon: usize, nlat: usize) -> Self {
        Self {
            nlon,
            nlat,
            data: vec![0.0; nlon * nlat],
        }
    }

    pub fn from_vec(nlon: usize, nlat: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            nlon * nlat,
            "Field2D data length must equal nlon*nlat"
        );
        Self { nlon, nlat, data }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        j * self.nlon + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    pub fn nlon(&self) -> usize {
        self.nlon
    }

    pub fn nlat(&self) -> usize {
        self.nlat
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// A dense `nlevs × nlat × nlon` field, indexed `(k, j, i)`.
#[derive(Debug, Clone)]
pub struct Field3D {
    nlon: usize,
    nlat: usize,
    nlevs: usize,
    data: Vec<f64>,
}

impl Field3D {
    pub fn from_vec(nlon: usize, nlat: usize, nlevs: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            nlon * nlat * nlevs,
            "Field3D data length must equal nlon*nlat*nlevs"
        );
        Self {
            nlon,
            nlat,
            nlevs,
            data,
        }
    }

    #[inline]
    fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.nlat + j) * self.nlon + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.data[self.index(i, j, k)]
    }

    pub fn nlon(&self) -> usize {
        self.nlon
    }

    pub fn nlat(&self) -> usize {
        self.nlat
    }

    pub fn nlevs(&self) -> usize {
        self.nlevs
    }
}

/// Raw per-time-step fields, in SI units, as handed to the engine by the
/// external field reader for one time index.
#[derive(Debug, Clone)]
pub struct FieldFrame {
    pub u: Field3D,
    pub v: Field3D,
    pub t: Field3D,
    pub pmsl: Field2D,
    pub u10: Field2D,
    pub zs: Option<Field2D>,
    pub tsu: Option<Field2D>,
}

impl FieldFrame {
    /// Multiply `pmsl` in place by 100 (hPa -> Pa), per `convert_pascals`.
    pub fn convert_pmsl_to_pascals(&mut self) {
        for v in &mut self.pmsl.data {
            *v *= 100.0;
        }
    }
}

/// Fields derived per step from a [`FieldFrame`] by the vorticity and
/// anomaly operators (§4.2, §4.3).
#[derive(Debug, Clone)]
pub struct DerivedFrame {
    pub vort: Field2D,
    pub tanom850: Field2D,
    pub tanom300: Field2D,
    pub tanomdiff: Field2D,
    pub tanomsum: Field2D,
    pub wspdchek: Field2D,
    pub pmslanom: Field2D,
}

impl DerivedFrame {
    pub fn zeros(nlon: usize, nlat: usize) -> Self {
        Self {
            vort: Field2D::zeros(nlon, nlat),
            tanom850: Field2D::zeros(nlon, nlat),
            tanom300: Field2D::zeros(nlon, nlat),
            tanomdiff: Field2D::zeros(nlon, nlat),
            tanomsum: Field2D::zeros(nlon, nlat),
            wspdchek: Field2D::zeros(nlon, nlat),
            pmslanom: Field2D::zeros(nlon, nlat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field2d_indexes_row_major_by_lat() {
        let mut f = Field2D::zeros(3, 2);
        f.set(2, 1, 7.0);
        assert_eq!(f.get(2, 1), 7.0);
        assert_eq!(f.as_slice()[1 * 3 + 2], 7.0);
    }

    #[test]
    fn field3d_indexes_level_outermost() {
        let data: Vec<f64> = (0..(2 * 3 * 4)).map(|v| v as f64).collect();
        let f = Field3D::from_vec(4, 3, 2, data);
        assert_eq!(f.get(0, 0, 0), 0.0);
        assert_eq!(f.get(0, 0, 1), (3 * 4) as f64);
    }

    #[test]
    fn convert_pmsl_scales_every_cell() {
        let mut frame = FieldFrame {
            u: Field3D::from_vec(1, 1, 1, vec![0.0]),
            v: Field3D::from_vec(1, 1, 1, vec![0.0]),
            t: Field3D::from_vec(1, 1, 1, vec![0.0]),
            pmsl: Field2D::from_vec(2, 1, vec![1010.0, 1000.0]),
            u10: Field2D::zeros(2, 1),
            zs: None,
            tsu: None,
        };
        frame.convert_pmsl_to_pascals();
        assert_eq!(frame.pmsl.get(0, 0), 101_000.0);
        assert_eq!(frame.pmsl.get(1, 0), 100_000.0);
    }
}
