//! Loads `Configuration` from an optional TOML namelist file and applies
//! CLI-flag overrides: CLI wins over the file, the file wins over
//! built-in defaults (§4.9).

use std::path::Path;

use tc_core::{Configuration, EngineError, Result};

use crate::Args;

pub fn load(args: &Args) -> Result<Configuration> {
    let mut config = if Path::new(&args.config).exists() {
        let text = std::fs::read_to_string(&args.config)
            .map_err(|e| EngineError::Config(format!("reading {}: {e}", args.config.display())))?;
        Configuration::from_toml_str(&text)?
    } else {
        Configuration::default()
    };

    if let Some(radius) = args.radius {
        config.radius = radius;
    }
    if let Some(farch) = args.farch {
        config.farch = farch;
    }
    if let Some(narch) = args.narch {
        config.narch = narch;
    }
    if let Some(vortcrit) = args.vortcrit {
        config.vortcrit = vortcrit;
    }
    if args.debug {
        config.debug = true;
    }

    config.validate()?;
    Ok(config)
}
