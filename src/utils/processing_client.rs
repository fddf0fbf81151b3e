use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::models::{ImageFile, ParameterSet, SubmissionOutcome};
use crate::utils::config::StudioConfig;

/// Multipart part name for the uploaded image
pub const IMAGE_PART: &str = "image_file";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("No image selected")]
    MissingImage,
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Processing service returned status {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl SubmitError {
    /// Failures below the success/error discriminant of the response body
    pub fn is_transport(&self) -> bool {
        !matches!(self, SubmitError::MissingImage)
    }
}

/// Everything that goes into one `/run` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub parameters: ParameterSet,
    pub image: ImageFile,
}

/// The remote processing service, as seen by the submission flow
pub trait ProcessingEndpoint: Send + Sync + 'static {
    fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> impl Future<Output = Result<SubmissionOutcome, SubmitError>> + Send;
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    success: bool,
    #[serde(default)]
    output_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode a `/run` response body
pub fn parse_run_response(body: &str) -> Result<SubmissionOutcome, SubmitError> {
    let response: RunResponse = serde_json::from_str(body)
        .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;

    match response {
        RunResponse {
            success: true,
            output_url: Some(output_url),
            ..
        } => Ok(SubmissionOutcome::Processed { output_url }),
        RunResponse {
            success: false,
            error: Some(message),
            ..
        } => Ok(SubmissionOutcome::Rejected { message }),
        RunResponse { success: true, .. } => Err(SubmitError::MalformedResponse(
            "success without output_url".to_string(),
        )),
        RunResponse { success: false, .. } => Err(SubmitError::MalformedResponse(
            "failure without error message".to_string(),
        )),
    }
}

/// Build the multipart body: six text parts and the image
pub fn build_form(payload: &SubmissionPayload) -> Form {
    let form = payload
        .parameters
        .parts()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name, value.to_string())
        });

    let image =
        Part::bytes(payload.image.bytes.to_vec()).file_name(payload.image.file_name.clone());
    form.part(IMAGE_PART, image)
}

/// HTTP client for the processing service
#[derive(Debug, Clone)]
pub struct ProcessingClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl ProcessingClient {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base_url =
            Url::parse(endpoint).with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;

        // Keep any path prefix when joining relative references
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &StudioConfig) -> anyhow::Result<Self> {
        Self::new(&config.endpoint, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn run_url(&self) -> Result<Url, SubmitError> {
        self.resolve("run")
    }

    /// Resolve a server-provided reference against the endpoint
    pub fn resolve(&self, reference: &str) -> Result<Url, SubmitError> {
        self.base_url.join(reference).map_err(|e| {
            SubmitError::MalformedResponse(format!("bad URL {:?}: {}", reference, e))
        })
    }

    fn classify(&self, e: reqwest::Error) -> SubmitError {
        if e.is_timeout() {
            SubmitError::Timeout(self.timeout)
        } else if let Some(status) = e.status() {
            SubmitError::Status(status.as_u16())
        } else {
            SubmitError::Transport(e.to_string())
        }
    }

    /// Download the processed image bytes
    pub async fn fetch_output(&self, output_url: &str) -> Result<Vec<u8>, SubmitError> {
        let url = self.resolve(output_url)?;
        debug!("Fetching processed image from {}", url);

        let response = self.http.get(url).send().await.map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(SubmitError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(bytes.to_vec())
    }
}

impl ProcessingEndpoint for ProcessingClient {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionOutcome, SubmitError> {
        let url = self.run_url()?;
        info!(
            "Submitting {} ({} bytes) to {}",
            payload.image.file_name,
            payload.image.len(),
            url
        );

        let response = self
            .http
            .post(url)
            .multipart(build_form(&payload))
            .send()
            .await
            .map_err(|e| {
                error!("Processing request failed: {}", e);
                self.classify(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Processing service returned status {}", status);
            return Err(SubmitError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        parse_run_response(&body)
    }
}
