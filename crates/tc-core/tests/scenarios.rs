//! End-to-end detection scenarios (§8): uniform fields, a synthetic
//! cyclone, duplicate merging, extratropical relaxation, the `t300flag`
//! switch and NVMAX overflow. Fixtures are built in-file rather than via
//! `tc-io`, since `tc-io` depends on this crate.

use tc_core::{Configuration, Engine, Field2D, Field3D, FieldFrame, RelaxMask};

fn flat_coords(nlon: usize, nlat: usize, lat0: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let lon: Vec<f64> = (0..nlon).map(|i| i as f64).collect();
    let lat: Vec<f64> = (0..nlat).map(|j| lat0 + j as f64).collect();
    let level = vec![1000.0, 850.0, 700.0, 500.0, 300.0];
    (lon, lat, level)
}

fn uniform_frame(nlon: usize, nlat: usize, nlevs: usize) -> FieldFrame {
    FieldFrame {
        u: Field3D::from_vec(nlon, nlat, nlevs, vec![0.0; nlon * nlat * nlevs]),
        v: Field3D::from_vec(nlon, nlat, nlevs, vec![0.0; nlon * nlat * nlevs]),
        t: Field3D::from_vec(nlon, nlat, nlevs, vec![280.0; nlon * nlat * nlevs]),
        pmsl: Field2D::from_vec(nlon, nlat, vec![1_010.0; nlon * nlat]),
        u10: Field2D::zeros(nlon, nlat),
        zs: None,
        tsu: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn rankine_frame(
    nlon: usize,
    nlat: usize,
    nlevs: usize,
    k850: usize,
    k300: usize,
    center_i: usize,
    center_j: usize,
    vmax: f64,
    warm300_amp: f64,
    warm850_amp: f64,
) -> FieldFrame {
    let mut u = vec![0.0; nlon * nlat * nlevs];
    let mut v = vec![0.0; nlon * nlat * nlevs];
    let mut t = vec![280.0; nlon * nlat * nlevs];
    let mut pmsl = vec![1_010.0; nlon * nlat]; // hPa; Engine converts to Pa
    let mut u10 = vec![0.0; nlon * nlat];

    for j in 0..nlat {
        for i in 0..nlon {
            let dx = i as i64 - center_i as i64;
            let dy = j as i64 - center_j as i64;
            let r = ((dx * dx + dy * dy) as f64).sqrt().max(1e-6);
            let speed850 = if r < 3.0 { vmax * r / 3.0 } else { vmax * 3.0 / r };
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

            pmsl[j * nlon + i] = 1_010.0 - 20.0 * (-r / 4.0).exp();
            u10[j * nlon + i] = speed850;

            t[k300 * nlat * nlon + j * nlon + i] += warm300_amp * (-r / 4.0).exp();
            t[k850 * nlat * nlon + j * nlon + i] += warm850_amp * (-r / 4.0).exp();
        }
    }

    FieldFrame {
        u: Field3D::from_vec(nlon, nlat, nlevs, u),
        v: Field3D::from_vec(nlon, nlat, nlevs, v),
        t: Field3D::from_vec(nlon, nlat, nlevs, t),
        pmsl: Field2D::from_vec(nlon, nlat, pmsl),
        u10: Field2D::from_vec(nlon, nlat, u10),
        zs: None,
        tsu: None,
    }
}

#[test]
fn uniform_field_yields_zero_detections_and_empty_relax_mask() {
    let (lon, lat, level) = flat_coords(30, 30, -10.0);
    let mut engine = Engine::new(Configuration::default(), lon, lat, level).unwrap();
    let frame = uniform_frame(30, 30, 5);
    let detections = engine.run_step(frame).unwrap();
    assert!(detections.is_empty());
    assert!(engine.relax_mask().as_bits().iter().all(|&b| !b));
}

#[test]
fn single_synthetic_cyclone_is_detected_once() {
    let nlon = 30;
    let nlat = 30;
    let nlevs = 5;
    let (lon, lat, level) = flat_coords(nlon, nlat, 5.0);
    let mut engine = Engine::new(Configuration::default(), lon, lat, level).unwrap();
    let k850 = engine.grid().k850();
    let k300 = engine.grid().k300();
    let frame = rankine_frame(nlon, nlat, nlevs, k850, k300, nlon / 2, nlat / 2, 25.0, 3.0, 1.0);
    let detections = engine.run_step(frame).unwrap();

    assert_eq!(detections.len(), 1);
    let d = detections[0];
    assert!(d.pmin < 100_000.0);
    assert!(d.wmax >= Configuration::default().wspcrit);
    assert!(d.ocs > 0.0);
}

#[test]
fn duplicated_adjacent_cyclone_merges_to_one_detection() {
    let nlon = 30;
    let nlat = 30;
    let nlevs = 5;
    let (lon, lat, level) = flat_coords(nlon, nlat, 5.0);
    let mut engine = Engine::new(Configuration::default(), lon, lat, level).unwrap();
    let k850 = engine.grid().k850();
    let k300 = engine.grid().k300();

    // Two overlapping pressure dips one grid cell apart: whichever the
    // criterion cascade and merge step resolve to, only one survives.
    let mut frame = rankine_frame(nlon, nlat, nlevs, k850, k300, nlon / 2, nlat / 2, 25.0, 3.0, 1.0);
    let second = rankine_frame(nlon, nlat, nlevs, k850, k300, nlon / 2 + 1, nlat / 2, 15.0, 3.0, 1.0);
    for j in 0..nlat {
        for i in 0..nlon {
            let p1 = frame.pmsl.get(i, j);
            let p2 = second.pmsl.get(i, j);
            if p2 < p1 {
                frame.pmsl.set(i, j, p2);
            }
        }
    }

    let detections = engine.run_step(frame).unwrap();
    assert_eq!(detections.len(), 1);
}

#[test]
fn extratropical_vortex_needs_relaxation() {
    let nlon = 30;
    let nlat = 30;
    let nlevs = 5;
    let (lon, lat, level) = flat_coords(nlon, nlat, 40.0);
    let mut engine = Engine::new(Configuration::default(), lon, lat, level).unwrap();
    assert!(engine.grid().lat().iter().all(|l| l.abs() > 30.0));
    let k850 = engine.grid().k850();
    let k300 = engine.grid().k300();
    let frame = rankine_frame(nlon, nlat, nlevs, k850, k300, nlon / 2, nlat / 2, 25.0, 3.0, 1.0);

    let detections = engine.run_step(frame.clone()).unwrap();
    assert!(detections.is_empty());

    // RelaxMask has no public cell-set constructor beyond from_bits; build
    // one with only the candidate cell true.
    let mut bits = vec![false; nlon * nlat];
    bits[(nlat / 2) * nlon + (nlon / 2)] = true;
    engine.set_relax_mask(RelaxMask::from_bits(nlon, nlat, bits));
    let detections = engine.run_step(frame).unwrap();
    assert_eq!(detections.len(), 1);
}

#[test]
fn t300flag_toggles_pass_fail() {
    let nlon = 30;
    let nlat = 30;
    let nlevs = 5;
    let (lon, lat, level) = flat_coords(nlon, nlat, 5.0);

    let mut config_flag_true = Configuration::default();
    config_flag_true.t300flag = true;
    let mut engine_true = Engine::new(config_flag_true, lon.clone(), lat.clone(), level.clone()).unwrap();
    let k850 = engine_true.grid().k850();
    let k300 = engine_true.grid().k300();
    // tanom300 (0.3ish via 3.0 amplitude at the centre) exceeds tanom850
    // (0.2ish via 1.0 amplitude), so t300flag=true should pass.
    let frame_true = rankine_frame(nlon, nlat, nlevs, k850, k300, nlon / 2, nlat / 2, 25.0, 3.0, 1.0);
    let detections_true = engine_true.run_step(frame_true).unwrap();
    assert_eq!(detections_true.len(), 1);

    let mut config_flag_false = Configuration::default();
    config_flag_false.t300flag = false;
    config_flag_false.t300crit = 50.0; // unreachable threshold
    let mut engine_false = Engine::new(config_flag_false, lon, lat, level).unwrap();
    let frame_false = rankine_frame(nlon, nlat, nlevs, k850, k300, nlon / 2, nlat / 2, 25.0, 3.0, 1.0);
    let detections_false = engine_false.run_step(frame_false).unwrap();
    assert!(detections_false.is_empty());
}

#[test]
fn nvmax_overflow_is_fatal() {
    // Build a grid with >NVMAX widely-spaced, trivially-qualifying
    // candidate cells: permissive thresholds for every magnitude-based
    // test, and structural (sign-pattern) fields that satisfy the
    // rotation test at every offset, so only the pressure-minimum and
    // bounds checks gate which cells become detections.
    let nlon = 200;
    let nlat = 200;
    let nlevs = 5;
    let lon: Vec<f64> = (0..nlon).map(|i| i as f64).collect();
    // Fine spacing so every candidate row stays within the |lat| <= 30
    // band and none needs relaxation to be considered.
    let lat: Vec<f64> = (0..nlat).map(|j| -25.0 + 0.25 * j as f64).collect();
    let level = vec![1000.0, 850.0, 700.0, 500.0, 300.0];

    let mut config = Configuration::default();
    config.radius = 10_000.0; // small enough that nxwidth/nywidth round to 0
    config.vortcrit = -1e10;
    config.wspcrit = -1e10;
    config.wchkcrit = -1e10;
    config.ocscrit = -1e10;
    config.tcrit = -1e10;
    config.t300crit = -1e10;
    config.pmslcrit = -1e10;

    let mut engine = Engine::new(config, lon, lat, level).unwrap();
    let k850 = engine.grid().k850();

    let mut u = vec![0.0; nlon * nlat * nlevs];
    let mut v = vec![0.0; nlon * nlat * nlevs];
    let t = vec![280.0; nlon * nlat * nlevs];
    let mut pmsl = vec![1_000.0; nlon * nlat]; // hPa; Engine converts to Pa
    let u10 = vec![0.0; nlon * nlat];

    for j in 0..nlat {
        let uval = if (j % 8) < 4 { 1.0 } else { -1.0 };
        for i in 0..nlon {
            let vval = if (i % 8) < 4 { 1.0 } else { -1.0 };
            let idx3 = k850 * nlat * nlon + j * nlon + i;
            u[idx3] = uval;
            v[idx3] = vval;
        }
    }

    let spacing = 6usize;
    let mut count = 0usize;
    let mut j = 4;
    while j + 4 < nlat {
        let mut i = 4;
        while i + 4 < nlon {
            pmsl[j * nlon + i] = 999.99;
            count += 1;
            i += spacing;
        }
        j += spacing;
    }
    assert!(count > tc_core::detect::NVMAX, "fixture must exceed NVMAX to exercise overflow");

    let frame = FieldFrame {
        u: Field3D::from_vec(nlon, nlat, nlevs, u),
        v: Field3D::from_vec(nlon, nlat, nlevs, v),
        t: Field3D::from_vec(nlon, nlat, nlevs, t),
        pmsl: Field2D::from_vec(nlon, nlat, pmsl),
        u10: Field2D::from_vec(nlon, nlat, u10),
        zs: None,
        tsu: None,
    };

    let err = engine.run_step(frame).unwrap_err();
    assert_eq!(err.exit_code(), 6);
}
