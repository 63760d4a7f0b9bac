//! Bundle manifest - provenance and integrity of one training run

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ArtifactError, CandidateFailure};
use crate::logic::features::LayoutInfo;
use crate::logic::model::{CandidateReport, Metrics, ModelKind};

pub const MANIFEST_FORMAT_VERSION: u32 = 1;

pub const MODEL_FILE: &str = "best_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const TARGET_ENCODER_FILE: &str = "target_encoder.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Checksummed payload files, in write order
pub const PAYLOAD_FILES: [&str; 4] = [MODEL_FILE, SCALER_FILE, ENCODERS_FILE, TARGET_ENCODER_FILE];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub layout: LayoutInfo,
    pub model: ModelKind,
    pub model_name: String,
    pub metrics: Metrics,
    pub candidates: Vec<CandidateReport>,
    #[serde(default)]
    pub skipped: Vec<CandidateFailure>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub seed: u64,
    pub created_at: DateTime<Utc>,
    /// file name → hex SHA-256, filled in when the bundle is written
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

impl Manifest {
    /// Layout and format must match this build
    pub fn validate_layout(&self) -> Result<(), ArtifactError> {
        if self.format_version != MANIFEST_FORMAT_VERSION {
            return Err(ArtifactError::Mismatch(format!(
                "manifest format v{} (expected v{})",
                self.format_version, MANIFEST_FORMAT_VERSION
            )));
        }
        if !self.layout.is_compatible() {
            let current = LayoutInfo::current();
            return Err(ArtifactError::Mismatch(format!(
                "feature layout v{} ({:08x}) does not match v{} ({:08x})",
                self.layout.version, self.layout.hash, current.version, current.hash
            )));
        }
        Ok(())
    }

    /// Compare a payload file against its recorded checksum
    pub fn verify(&self, file: &str, bytes: &[u8]) -> Result<(), ArtifactError> {
        let expected = self.checksums.get(file).ok_or_else(|| {
            ArtifactError::Mismatch(format!("manifest has no checksum for {}", file))
        })?;
        let actual = sha256_hex(bytes);
        if *expected != actual {
            return Err(ArtifactError::Mismatch(format!(
                "{} checksum {} does not match manifest {}; artifacts from different runs?",
                file,
                &actual[..12],
                expected.get(..12).unwrap_or(expected)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        Manifest {
            format_version: MANIFEST_FORMAT_VERSION,
            layout: LayoutInfo::current(),
            model: ModelKind::RandomForest,
            model_name: "Random Forest".into(),
            metrics: Metrics::default(),
            candidates: vec![],
            skipped: vec![],
            train_rows: 480,
            test_rows: 120,
            seed: 42,
            created_at: Utc::now(),
            checksums: BTreeMap::from([(MODEL_FILE.to_string(), sha256_hex(b"model"))]),
        }
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_checksum() {
        let m = manifest();
        assert!(m.verify(MODEL_FILE, b"model").is_ok());
        assert!(matches!(m.verify(MODEL_FILE, b"other"), Err(ArtifactError::Mismatch(_))));
        assert!(m.verify(SCALER_FILE, b"model").is_err());
    }

    #[test]
    fn test_layout_mismatch_detected() {
        let mut m = manifest();
        assert!(m.validate_layout().is_ok());
        m.layout.hash ^= 1;
        assert!(matches!(m.validate_layout(), Err(ArtifactError::Mismatch(_))));
    }

    #[test]
    fn test_serde_round_trip() {
        let m = manifest();
        let json = serde_json::to_string_pretty(&m).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
