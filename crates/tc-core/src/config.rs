//! Detection thresholds and run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Namelist-equivalent configuration for a detection run.
///
/// Every field carries a default so a TOML file only needs to override
/// what it cares about; see [`Configuration::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Warm-core sum threshold, K.
    pub tcrit: f64,
    /// Unsigned vorticity magnitude threshold, 1/s (sign flipped in the SH).
    pub vortcrit: f64,
    /// 10 m max-wind threshold, m/s.
    pub wspcrit: f64,
    /// Vertical wind-speed shear threshold, m/s.
    pub wchkcrit: f64,
    /// OCS threshold, m/s.
    pub ocscrit: f64,
    /// 300 hPa anomaly threshold used when `t300flag` is false, K.
    pub t300crit: f64,
    /// If true, the 300 hPa anomaly must exceed the 850 hPa anomaly rather
    /// than `t300crit`.
    pub t300flag: bool,
    /// Negative MSLP anomaly threshold, hPa.
    pub pmslcrit: f64,
    /// Physical search radius, m.
    pub radius: f64,
    /// Multiply MSLP by 100 on read (hPa -> Pa).
    pub convert_pascals: bool,
    /// First time index to process (inclusive).
    pub farch: usize,
    /// Last time index to process (inclusive).
    pub narch: usize,
    /// Emit per-cell trace events for the `(id, jd)` cell.
    pub debug: bool,
    /// Diagnostic cell longitude index.
    pub id: usize,
    /// Diagnostic cell latitude index.
    pub jd: usize,
    /// Open question #1: multiplies `wspcrit` for relaxed cells. Default
    /// 1.0 reproduces the source's unmodified threshold.
    pub relax_wind_factor: f64,
    /// Open question #2: compare `|vort_here|` instead of the signed value
    /// when deduplicating. Default false reproduces the source's behaviour.
    pub dedup_abs_vorticity: bool,
    /// Open question #3: enable the SST/topography location test. Default
    /// false reproduces the source's hard-coded bypass.
    pub location_check: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            tcrit: 0.0,
            vortcrit: 3.5e-5,
            wspcrit: 15.0,
            wchkcrit: 5.0,
            ocscrit: 0.0,
            t300crit: 0.5,
            t300flag: true,
            pmslcrit: 2.0,
            radius: 300_000.0,
            convert_pascals: true,
            farch: 0,
            narch: 0,
            debug: false,
            id: 0,
            jd: 0,
            relax_wind_factor: 1.0,
            dedup_abs_vorticity: false,
            location_check: false,
        }
    }
}

impl Configuration {
    /// Load from a TOML document, falling back to defaults for omitted fields.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Validate internal consistency. Geometry- and grid-level checks
    /// (degenerate spacing, missing pressure levels) are the Grid/Geometry
    /// constructors' responsibility, not this struct's.
    pub fn validate(&self) -> Result<()> {
        let finite_fields: [(&str, f64); 8] = [
            ("tcrit", self.tcrit),
            ("vortcrit", self.vortcrit),
            ("wspcrit", self.wspcrit),
            ("wchkcrit", self.wchkcrit),
            ("ocscrit", self.ocscrit),
            ("t300crit", self.t300crit),
            ("pmslcrit", self.pmslcrit),
            ("radius", self.radius),
        ];
        for (name, value) in finite_fields {
            if !value.is_finite() {
                return Err(EngineError::Config(format!("{name} must be finite")));
            }
        }
        if self.radius <= 0.0 {
            return Err(EngineError::Config("radius must be > 0".to_string()));
        }
        if self.farch > self.narch {
            return Err(EngineError::Config(format!(
                "farch ({}) must be <= narch ({})",
                self.farch, self.narch
            )));
        }
        if !self.relax_wind_factor.is_finite() || self.relax_wind_factor < 0.0 {
            return Err(EngineError::Config(
                "relax_wind_factor must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}
