//! Versioned save/load of trained models.
//!
//! The artifact is a single postcard-encoded file carrying the embedding
//! dimension, both vocabularies, and both tables. A version tag at the
//! front guards against reading artifacts written by an incompatible
//! format revision.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::TwoTowerModel;
use crate::error::{Error, Result};

/// Artifact format revision this build reads and writes.
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ArtifactFile {
    version: u32,
    model: TwoTowerModel,
}

impl TwoTowerModel {
    /// Serializes the model to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactFormat`] on encoding failure and I/O
    /// errors from the write.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = ArtifactFile {
            version: ARTIFACT_VERSION,
            model: self.clone(),
        };
        let bytes =
            postcard::to_allocvec(&file).map_err(|e| Error::ArtifactFormat(e.to_string()))?;
        std::fs::write(path.as_ref(), bytes)?;

        tracing::info!(path = %path.as_ref().display(), "model artifact saved");
        Ok(())
    }

    /// Loads a model previously written by [`TwoTowerModel::save`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactVersion`] on a version mismatch,
    /// [`Error::ArtifactFormat`] on undecodable bytes, and I/O errors from
    /// the read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let file: ArtifactFile =
            postcard::from_bytes(&bytes).map_err(|e| Error::ArtifactFormat(e.to_string()))?;

        if file.version != ARTIFACT_VERSION {
            return Err(Error::ArtifactVersion {
                found: file.version,
                expected: ARTIFACT_VERSION,
            });
        }

        let mut model = file.model;
        model.rehydrate();
        Ok(model)
    }
}
