//! CLI driver (component BIN) wiring configuration, logging, the
//! reference I/O layer and the detection `Engine` together.
//!
//! The field source here is always the in-memory synthetic generator in
//! `tc_io`; a production NetCDF/GRIB2 reader is an external collaborator
//! this binary does not implement (see the crate-level docs in
//! `tc-core`).

mod config_loader;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tc_core::{DetectionWriter, Engine, RelaxMaskStore};
use tc_io::calendar;
use tc_io::{FixedWidthWriter, JsonRelaxMaskStore, SyntheticFieldReader};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Scene {
    Uniform,
    Rankine,
}

#[derive(Parser, Debug)]
#[command(name = "tc-detect")]
#[command(about = "Tropical-cyclone detection engine")]
pub struct Args {
    /// Namelist-equivalent TOML configuration file.
    #[arg(long, default_value = "tc-detect.toml")]
    config: PathBuf,

    /// Override `radius` (m).
    #[arg(long)]
    radius: Option<f64>,

    /// Override `farch` (first time index, inclusive).
    #[arg(long)]
    farch: Option<usize>,

    /// Override `narch` (last time index, inclusive).
    #[arg(long)]
    narch: Option<usize>,

    /// Override `vortcrit` (1/s).
    #[arg(long)]
    vortcrit: Option<f64>,

    /// Force per-cell trace diagnostics on, regardless of the config file.
    #[arg(long)]
    debug: bool,

    /// Synthetic scene to scan.
    #[arg(long, value_enum, default_value_t = Scene::Rankine)]
    scene: Scene,

    /// Longitude grid points in the synthetic scene.
    #[arg(long, default_value = "60")]
    nlon: usize,

    /// Latitude grid points in the synthetic scene.
    #[arg(long, default_value = "60")]
    nlat: usize,

    /// Time steps in the synthetic scene.
    #[arg(long, default_value = "1")]
    ntimes: usize,

    /// Fixed-width detection output path.
    #[arg(long, default_value = "detections.txt")]
    output: PathBuf,

    /// Relaxation-mask persistence file; absent means fresh start.
    #[arg(long, default_value = "relax_mask.json")]
    relax_mask_path: PathBuf,

    /// Minutes between synthetic time steps, for the output timestamp.
    #[arg(long, default_value = "360")]
    step_minutes: i64,

    /// `tracing` log level.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn build_reader(args: &Args) -> SyntheticFieldReader {
    let lon: Vec<f64> = (0..args.nlon).map(|i| i as f64).collect();
    let lat: Vec<f64> = (0..args.nlat).map(|j| 5.0 + j as f64).collect();
    let level = vec![1000.0, 850.0, 700.0, 500.0, 300.0];
    match args.scene {
        Scene::Uniform => SyntheticFieldReader::uniform(lon, lat, level, args.ntimes, 280.0, 101_000.0, 3.0),
        Scene::Rankine => SyntheticFieldReader::rankine_vortex(
            lon,
            lat,
            level,
            args.ntimes,
            args.nlon / 2,
            args.nlat / 2,
            25.0,
            101_000.0,
            2_000.0,
            4.0,
            280.0,
            1,
            4,
        ),
    }
}

fn run(args: Args) -> tc_core::Result<()> {
    let config = config_loader::load(&args)?;
    let reader = build_reader(&args);

    use tc_core::FieldReader;
    let mut engine = Engine::new(
        config.clone(),
        reader.lon().to_vec(),
        reader.lat().to_vec(),
        reader.level().to_vec(),
    )?;

    let relax_store = JsonRelaxMaskStore::new(&args.relax_mask_path);
    if let Some(mask) = relax_store.load()? {
        engine.set_relax_mask(mask);
    }

    let output = std::fs::File::create(&args.output)
        .map_err(|e| tc_core::EngineError::Io(format!("creating {}: {e}", args.output.display())))?;
    let mut writer = FixedWidthWriter::new(output, reader.lon().to_vec(), reader.lat().to_vec());

    let origin = tc_core::StepTimestamp {
        year: 2024,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
    };

    for t in config.farch..=config.narch {
        let frame = tc_core::FieldFrame {
            u: reader.read_3d("u", t)?,
            v: reader.read_3d("v", t)?,
            t: reader.read_3d("temp", t)?,
            pmsl: reader.read_2d("psl", t)?,
            u10: reader.read_2d("u10", t)?,
            zs: reader.read_2d("zs", t).ok(),
            tsu: reader.read_2d("tsu", t).ok(),
        };

        let detections = engine.run_step(frame)?;
        let timestamp = calendar::at_step(origin, args.step_minutes, t);

        // Persist the relax mask unconditionally once the step itself has
        // succeeded: a write-side IO error must not revert it to the prior
        // step's state.
        relax_store.save(engine.relax_mask())?;
        writer.write_step(timestamp, &detections)?;

        info!(t, count = detections.len(), "wrote step");
    }

    Ok(())
}

fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "tc-detect run failed");
            std::process::ExitCode::from(e.exit_code() as u8)
        }
    }
}
