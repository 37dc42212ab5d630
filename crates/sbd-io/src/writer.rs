//! JSON result writer for distance and partition outputs.

use std::fs;
use std::path::{Path, PathBuf};

use sbd_core::{Blocks, Matrix, Partition, SbdResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes distance and partition results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_distance.json` and
/// `{experiment}_blocks.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path of the distance artifact.
    #[must_use]
    pub fn distance_path(&self) -> PathBuf {
        self.artifact_path("distance")
    }

    /// Return the path of the blocks artifact.
    #[must_use]
    pub fn blocks_path(&self) -> PathBuf {
        self.artifact_path("blocks")
    }

    /// Write a distance result to `{experiment}_distance.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | the artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | the file cannot be written |
    #[instrument(skip_all)]
    pub fn write_distance(
        &self,
        partition: &Partition,
        result: &SbdResult,
        estimator: &str,
    ) -> Result<(), IoError> {
        let artifact = DistanceArtifact {
            experiment: self.experiment.as_str(),
            estimator,
            n1: partition.n1(),
            n1_total: partition.n1_total(),
            n2: partition.n2(),
            n2_total: partition.n2_total(),
            distance: result.distance.value(),
            first_term: result.first_term,
            second_term: result.second_term,
        };
        let path = self.distance_path();
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "distance result written");
        Ok(())
    }

    /// Write the four partition blocks to `{experiment}_blocks.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | the artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | the file cannot be written |
    #[instrument(skip_all)]
    pub fn write_blocks(&self, blocks: &Blocks) -> Result<(), IoError> {
        let artifact = BlocksArtifact {
            experiment: self.experiment.as_str(),
            xx: BlockEntry::from(&blocks.xx),
            xy: BlockEntry::from(&blocks.xy),
            yx: BlockEntry::from(&blocks.yx),
            yy: BlockEntry::from(&blocks.yy),
        };
        let path = self.blocks_path();
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "blocks written");
        Ok(())
    }

    fn artifact_path(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.experiment.as_str()))
    }
}

fn write_json(path: &Path, artifact: &impl Serialize) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Serialization structs ---

#[derive(Serialize)]
struct DistanceArtifact<'a> {
    experiment: &'a str,
    estimator: &'a str,
    n1: usize,
    n1_total: usize,
    n2: usize,
    n2_total: usize,
    distance: f64,
    first_term: f64,
    second_term: f64,
}

#[derive(Serialize)]
struct BlocksArtifact<'a> {
    experiment: &'a str,
    xx: BlockEntry,
    xy: BlockEntry,
    yx: BlockEntry,
    yy: BlockEntry,
}

#[derive(Serialize)]
struct BlockEntry {
    rows: usize,
    cols: usize,
    values: Vec<Vec<f64>>,
}

impl From<&Matrix> for BlockEntry {
    fn from(m: &Matrix) -> Self {
        Self {
            rows: m.rows(),
            cols: m.cols(),
            values: m.to_rows(),
        }
    }
}
