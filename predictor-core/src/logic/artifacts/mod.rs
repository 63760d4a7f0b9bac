//! Artifacts Module - persisted output of one training run
//!
//! Four JSON payloads (model, scaler, categorical encoders, target encoder)
//! plus `manifest.json`. They are written and loaded together; the manifest
//! checksums reject bundles assembled from different runs.

pub mod manifest;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use manifest::{
    sha256_hex, Manifest, ENCODERS_FILE, MANIFEST_FILE, MODEL_FILE, PAYLOAD_FILES, SCALER_FILE,
    TARGET_ENCODER_FILE,
};

use crate::error::ArtifactError;
use crate::logic::features::{FEATURE_COUNT, TARGET_COLUMN};
use crate::logic::model::{Classifier, TrainedModel};
use crate::logic::preprocess::{CategoricalEncoders, LabelEncoder, Preprocessor, StandardScaler};

/// Everything inference needs, fit by one training run
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    pub model: TrainedModel,
    pub scaler: StandardScaler,
    pub encoders: CategoricalEncoders,
    pub target_encoder: LabelEncoder,
    pub manifest: Manifest,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ArtifactError + '_ {
    move |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn to_json<T: Serialize>(file: &str, value: &T) -> Result<Vec<u8>, ArtifactError> {
    serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Parse {
        file: file.to_string(),
        source,
    })
}

fn from_json<T: DeserializeOwned>(file: &str, bytes: &[u8]) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse {
        file: file.to_string(),
        source,
    })
}

impl ArtifactBundle {
    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.encoders.clone(), self.scaler.clone())
    }

    /// Cross-file consistency independent of checksums
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let mismatch = |msg: String| Err(ArtifactError::Mismatch(msg));

        if self.model.n_features() != FEATURE_COUNT {
            return mismatch(format!(
                "model expects {} features, layout has {}",
                self.model.n_features(),
                FEATURE_COUNT
            ));
        }
        if !self.model.is_well_formed() {
            return mismatch("model parameters are not well formed".to_string());
        }
        if self.scaler.n_features() != FEATURE_COUNT || !self.scaler.is_valid() {
            return mismatch("scaler does not cover the feature layout".to_string());
        }
        if !self.encoders.covers_layout() {
            return mismatch("label encoders do not cover the categorical columns".to_string());
        }
        if self.target_encoder.column() != TARGET_COLUMN || self.target_encoder.len() != 2 {
            return mismatch(format!(
                "target encoder must hold two '{}' classes, found {:?}",
                TARGET_COLUMN,
                self.target_encoder.classes()
            ));
        }
        if self.manifest.model != self.model.kind() {
            return mismatch(format!(
                "manifest names {} but model file holds {}",
                self.manifest.model,
                self.model.kind()
            ));
        }
        Ok(())
    }

    /// Write all payloads, then the manifest with their checksums.
    /// Returns the manifest as written.
    pub fn save(&self, dir: &Path) -> Result<Manifest, ArtifactError> {
        fs::create_dir_all(dir).map_err(io_error(dir))?;

        let payloads = [
            (MODEL_FILE, to_json(MODEL_FILE, &self.model)?),
            (SCALER_FILE, to_json(SCALER_FILE, &self.scaler)?),
            (ENCODERS_FILE, to_json(ENCODERS_FILE, &self.encoders)?),
            (TARGET_ENCODER_FILE, to_json(TARGET_ENCODER_FILE, &self.target_encoder)?),
        ];

        let mut manifest = self.manifest.clone();
        manifest.checksums.clear();
        for (file, bytes) in &payloads {
            let path = dir.join(file);
            fs::write(&path, bytes).map_err(io_error(&path))?;
            manifest.checksums.insert(file.to_string(), sha256_hex(bytes));
            log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        }

        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, to_json(MANIFEST_FILE, &manifest)?).map_err(io_error(&path))?;

        log::info!("Artifacts written to {}", dir.display());
        Ok(manifest)
    }

    /// Load and verify a bundle; any absent file is `ArtifactError::Missing`
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let missing: Vec<String> = PAYLOAD_FILES
            .iter()
            .chain(std::iter::once(&MANIFEST_FILE))
            .filter(|f| !dir.join(f).is_file())
            .map(|f| f.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ArtifactError::Missing {
                dir: dir.to_path_buf(),
                files: missing,
            });
        }

        let read = |file: &str| -> Result<Vec<u8>, ArtifactError> {
            let path: PathBuf = dir.join(file);
            fs::read(&path).map_err(io_error(&path))
        };

        let manifest: Manifest = from_json(MANIFEST_FILE, &read(MANIFEST_FILE)?)?;
        manifest.validate_layout()?;

        let payload = |file: &str| -> Result<Vec<u8>, ArtifactError> {
            let bytes = read(file)?;
            manifest.verify(file, &bytes)?;
            Ok(bytes)
        };
        let model = from_json(MODEL_FILE, &payload(MODEL_FILE)?)?;
        let scaler = from_json(SCALER_FILE, &payload(SCALER_FILE)?)?;
        let encoders = from_json(ENCODERS_FILE, &payload(ENCODERS_FILE)?)?;
        let target_encoder = from_json(TARGET_ENCODER_FILE, &payload(TARGET_ENCODER_FILE)?)?;

        let bundle = Self {
            model,
            scaler,
            encoders,
            target_encoder,
            manifest,
        };
        bundle.validate()?;

        log::info!(
            "Loaded {} artifacts from {} (trained {})",
            bundle.model.name(),
            dir.display(),
            bundle.manifest.created_at.to_rfc3339()
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests;
