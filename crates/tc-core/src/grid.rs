//! Grid coordinates and the privileged pressure-level lookup.

use crate::error::{EngineError, Result};

/// The four pressure levels (hPa) every run must find in the vertical axis.
const PRIVILEGED_LEVELS: [f64; 4] = [850.0, 700.0, 500.0, 300.0];

/// Immutable coordinate system for a run: longitude, latitude and pressure
/// level vectors, plus the indices of the four privileged levels.
#[derive(Debug, Clone)]
pub struct Grid {
    lon: Vec<f64>,
    lat: Vec<f64>,
    level: Vec<f64>,
    k850: usize,
    k700: usize,
    k500: usize,
    k300: usize,
}

impl Grid {
    /// Build a grid from coordinate vectors, locating the four privileged
    /// levels by exact equality. Fails if any is absent.
    pub fn new(lon: Vec<f64>, lat: Vec<f64>, level: Vec<f64>) -> Result<Self> {
        let find = |target: f64| -> Result<usize> {
            level
                .iter()
                .position(|&l| l == target)
                .ok_or_else(|| EngineError::Geometry(format!("missing pressure level {target} hPa")))
        };
        let k850 = find(PRIVILEGED_LEVELS[0])?;
        let k700 = find(PRIVILEGED_LEVELS[1])?;
        let k500 = find(PRIVILEGED_LEVELS[2])?;
        let k300 = find(PRIVILEGED_LEVELS[3])?;
        Ok(Self {
            lon,
            lat,
            level,
            k850,
            k700,
            k500,
            k300,
        })
    }

    pub fn nlon(&self) -> usize {
        self.lon.len()
    }

    pub fn nlat(&self) -> usize {
        self.lat.len()
    }

    pub fn nlevs(&self) -> usize {
        self.level.len()
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn level(&self) -> &[f64] {
        &self.level
    }

    pub fn k850(&self) -> usize {
        self.k850
    }

    pub fn k700(&self) -> usize {
        self.k700
    }

    pub fn k500(&self) -> usize {
        self.k500
    }

    pub fn k300(&self) -> usize {
        self.k300
    }

    /// Whether cell `j` lies in the Southern Hemisphere (used for the
    /// vorticity and OCS sign conventions).
    pub fn is_southern(&self, j: usize) -> bool {
        self.lat[j] < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_levels() -> Vec<f64> {
        vec![1000.0, 850.0, 700.0, 500.0, 300.0, 200.0]
    }

    #[test]
    fn finds_all_privileged_levels() {
        let grid = Grid::new(vec![0.0, 1.0], vec![-1.0, 0.0, 1.0], sample_levels()).unwrap();
        assert_eq!(grid.level()[grid.k850()], 850.0);
        assert_eq!(grid.level()[grid.k700()], 700.0);
        assert_eq!(grid.level()[grid.k500()], 500.0);
        assert_eq!(grid.level()[grid.k300()], 300.0);
    }

    #[test]
    fn errors_on_missing_level() {
        let levels = vec![1000.0, 850.0, 700.0, 500.0];
        let err = Grid::new(vec![0.0], vec![0.0], levels).unwrap_err();
        assert!(matches!(err, EngineError::Geometry(_)));
    }

    #[test]
    fn southern_hemisphere_by_sign() {
        let grid = Grid::new(vec![0.0], vec![-10.0, 10.0], sample_levels()).unwrap();
        assert!(grid.is_southern(0));
        assert!(!grid.is_southern(1));
    }
}
