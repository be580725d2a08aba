//! JSON-backed persistence for the relaxation mask.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tc_core::{EngineError, RelaxMask, RelaxMaskStore, Result};

#[derive(Serialize, Deserialize)]
struct MaskDocument {
    nlon: usize,
    nlat: usize,
    bits: Vec<bool>,
}

/// Persists a [`RelaxMask`] to a single JSON file. A missing file means
/// fresh initialisation, per §6.
pub struct JsonRelaxMaskStore {
    path: PathBuf,
}

impl JsonRelaxMaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RelaxMaskStore for JsonRelaxMaskStore {
    fn load(&self) -> Result<Option<RelaxMask>> {
        if !Path::new(&self.path).exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| EngineError::Io(e.to_string()))?;
        let doc: MaskDocument = serde_json::from_str(&text).map_err(|e| EngineError::Io(e.to_string()))?;
        Ok(Some(RelaxMask::from_bits(doc.nlon, doc.nlat, doc.bits)))
    }

    fn save(&self, mask: &RelaxMask) -> Result<()> {
        let doc = MaskDocument {
            nlon: mask.nlon(),
            nlat: mask.nlat(),
            bits: mask.as_bits().to_vec(),
        };
        let text = serde_json::to_string(&doc).map_err(|e| EngineError::Io(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| EngineError::Io(e.to_string()))
    }
}
