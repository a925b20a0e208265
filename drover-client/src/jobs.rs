//! Job endpoints

use crate::DroverClient;
use crate::error::Result;
use drover_core::domain::job::JobSnapshot;
use drover_core::domain::record::Record;
use drover_core::dto::job::{ControlResponse, ResultsLocation, SubmitJob, SubmitResponse};

impl DroverClient {
    // =============================================================================
    // Submission
    // =============================================================================

    /// Start a job from already parsed records
    pub async fn submit_job(&self, records: Vec<Record>) -> Result<SubmitResponse> {
        let url = format!("{}/job/submit", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SubmitJob { records })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Start a job from raw `identifier,secret` text
    ///
    /// Parsing happens server side, so line numbers in errors refer to `text`.
    pub async fn upload_job(&self, text: String) -> Result<SubmitResponse> {
        let url = format!("{}/job/upload", self.base_url);
        let response = self.client.post(&url).body(text).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Control
    // =============================================================================

    /// Snapshot of the current job
    pub async fn job_status(&self) -> Result<JobSnapshot> {
        let url = format!("{}/job/status", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    pub async fn pause_job(&self) -> Result<ControlResponse> {
        self.control("pause").await
    }

    pub async fn resume_job(&self) -> Result<ControlResponse> {
        self.control("resume").await
    }

    /// Cancel any active job and clear spooled uploads
    pub async fn reset_job(&self) -> Result<ControlResponse> {
        self.control("reset").await
    }

    async fn control(&self, action: &str) -> Result<ControlResponse> {
        let url = format!("{}/job/{}", self.base_url, action);
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    /// Send a test message through the server's notification sink
    ///
    /// Fails with a 502 [`ClientError::ApiError`](crate::ClientError) when the
    /// sink rejects the message.
    pub async fn test_notifier(&self) -> Result<ControlResponse> {
        let url = format!("{}/notifier/test", self.base_url);
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Results
    // =============================================================================

    /// Where the server wrote the last results artifact
    pub async fn results_location(&self) -> Result<ResultsLocation> {
        let url = format!("{}/job/results", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Raw bytes of the last results artifact
    pub async fn download_results(&self) -> Result<Vec<u8>> {
        let url = format!("{}/job/results/download", self.base_url);
        let response = self.client.get(&url).send().await?;

        let bytes = self.check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
