//! Results artifact writer
//!
//! One JSON file per job at `<results_dir>/job_<id>.json`.

use drover_core::domain::results::ResultsArtifact;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ResultsWriter {
    dir: PathBuf,
}

impl ResultsWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of the artifact for `job_id`
    pub fn path_for(&self, job_id: Uuid) -> PathBuf {
        self.dir.join(format!("job_{}.json", job_id))
    }

    /// Writes the artifact, replacing the file in one rename
    pub async fn write(&self, artifact: &ResultsArtifact) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(artifact.job_id);
        let tmp = self.dir.join(format!(".job_{}.json.tmp", artifact.job_id));

        let body = serde_json::to_vec_pretty(artifact)?;
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;

        info!("Wrote results for job {} to {}", artifact.job_id, path.display());
        Ok(path)
    }

    /// Reads back a previously written artifact
    pub async fn read(&self, job_id: Uuid) -> Result<ResultsArtifact> {
        let body = tokio::fs::read(self.path_for(job_id)).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
