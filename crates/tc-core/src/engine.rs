//! Step driver (component S) and the trait boundaries to the external
//! field reader, detection writer and relaxation-mask store.

use tracing::info;

use crate::anomaly::compute_anomalies;
use crate::config::Configuration;
use crate::dedup::deduplicate;
use crate::detect::{run_criterion_pass, Detection};
use crate::error::Result;
use crate::fields::{DerivedFrame, Field2D, Field3D, FieldFrame};
use crate::geometry::GeometryTable;
use crate::grid::Grid;
use crate::relax::RelaxMask;

/// A point in time labelling one step's output row. Plain data: the
/// calendar arithmetic to advance it belongs to the I/O layer, not the
/// core (§4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTimestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Supplies the per-step raw fields the engine consumes.
///
/// A production implementation reads these from NetCDF/GRIB2; that
/// implementation is out of scope here (§1) and is represented only by
/// this trait boundary plus a synthetic reference implementation in
/// `tc-io`.
pub trait FieldReader {
    /// `(nlon, nlat, nlevs, ntimes)`.
    fn dims(&self) -> (usize, usize, usize, usize);
    fn lon(&self) -> &[f64];
    fn lat(&self) -> &[f64];
    fn level(&self) -> &[f64];
    fn read_2d(&self, name: &str, t: usize) -> Result<Field2D>;
    fn read_3d(&self, name: &str, t: usize) -> Result<Field3D>;
}

/// Consumes one step's detections.
pub trait DetectionWriter {
    fn write_step(&mut self, timestamp: StepTimestamp, detections: &[Detection]) -> Result<()>;
}

/// Persists the relaxation mask across process invocations.
pub trait RelaxMaskStore {
    fn load(&self) -> Result<Option<RelaxMask>>;
    fn save(&self, mask: &RelaxMask) -> Result<()>;
}

/// Per-run state: grid, precomputed geometry, configuration and the
/// relaxation mask carried across steps. Built once; [`Engine::run_step`]
/// is called once per time index.
pub struct Engine {
    config: Configuration,
    grid: Grid,
    geometry: GeometryTable,
    relax: RelaxMask,
    derived: DerivedFrame,
}

impl Engine {
    /// Build the engine: validates `config`, constructs the [`Grid`]
    /// (failing if a privileged pressure level is absent) and precomputes
    /// the [`GeometryTable`] (failing on degenerate spacing). Starts with
    /// an all-false relaxation mask; call [`Engine::set_relax_mask`] to
    /// resume from a persisted one.
    pub fn new(config: Configuration, lon: Vec<f64>, lat: Vec<f64>, level: Vec<f64>) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(lon, lat, level)?;
        let geometry = GeometryTable::build(&grid, config.radius)?;
        let relax = RelaxMask::new(grid.nlon(), grid.nlat());
        let derived = DerivedFrame::zeros(grid.nlon(), grid.nlat());
        Ok(Self {
            config,
            grid,
            geometry,
            relax,
            derived,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn geometry(&self) -> &GeometryTable {
        &self.geometry
    }

    pub fn relax_mask(&self) -> &RelaxMask {
        &self.relax
    }

    pub fn set_relax_mask(&mut self, mask: RelaxMask) {
        self.relax = mask;
    }

    /// Run one time step: (2) convert MSLP if configured, (3) compute V
    /// and A, (4) run the criterion cascade C, (5) deduplicate via D, (6)
    /// update the relaxation mask R. Steps (1) fetch and (7) write are the
    /// caller's responsibility, since both cross the external-collaborator
    /// boundary.
    pub fn run_step(&mut self, mut frame: FieldFrame) -> Result<Vec<Detection>> {
        if self.config.convert_pascals {
            frame.convert_pmsl_to_pascals();
        }

        let vort = crate::vorticity::compute_vorticity(&frame.u, &frame.v, self.grid.k850(), &self.geometry);
        compute_anomalies(&frame, &self.grid, &self.geometry, &mut self.derived)?;
        self.derived.vort = vort;

        let detections =
            run_criterion_pass(&frame, &self.derived, &self.grid, &self.geometry, &self.relax, &self.config)?;
        let deduped = deduplicate(detections, &self.geometry, &self.config);

        info!(count = deduped.len(), "step complete");

        self.relax = RelaxMask::update(&deduped, &self.geometry, self.grid.nlon(), self.grid.nlat());
        Ok(deduped)
    }
}
