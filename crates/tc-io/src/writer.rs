//! Fixed-width detection writer matching the column layout in §6.

use std::io::Write;

use tc_core::{Detection, DetectionWriter, EngineError, Result, StepTimestamp};

/// Renders detections as fixed-width text:
/// `YYYY MM DD HHMM  LON  LAT  PMIN_hPa  VORTICITY  WMAX  TSUM  TDIFF  OCS  WMAX_LON  WMAX_LAT`
pub struct FixedWidthWriter<W: Write> {
    inner: W,
    lon: Vec<f64>,
    lat: Vec<f64>,
}

impl<W: Write> FixedWidthWriter<W> {
    pub fn new(inner: W, lon: Vec<f64>, lat: Vec<f64>) -> Self {
        Self { inner, lon, lat }
    }
}

impl<W: Write> DetectionWriter for FixedWidthWriter<W> {
    fn write_step(&mut self, timestamp: StepTimestamp, detections: &[Detection]) -> Result<()> {
        for d in detections {
            writeln!(
                self.inner,
                "{:04} {:02} {:02} {:02}{:02}  {:9.3} {:9.3}  {:10.3} {:13.6e} {:8.3} {:8.3} {:8.3} {:10.4} {:9.3} {:9.3}",
                timestamp.year,
                timestamp.month,
                timestamp.day,
                timestamp.hour,
                timestamp.minute,
                self.lon[d.ips],
                self.lat[d.jps],
                d.pmin / 100.0,
                d.vort_here,
                d.wmax,
                d.tsum,
                d.tdiff,
                d.ocs,
                self.lon[d.iwmax],
                self.lat[d.jwmax],
            )
            .map_err(|e| EngineError::Io(e.to_string()))?;
        }
        Ok(())
    }
}
