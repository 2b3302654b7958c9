//! Blocking HTTP client for the remote inference backend.
//!
//! All diagnostics are delegated: this module only validates inputs,
//! ships them over HTTP, and normalizes the responses. Failures are
//! local and non-fatal — no retries, no backoff.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Uploads are capped at 10 MiB before any network call is made.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Content types the image endpoints accept.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("no symptoms selected")]
    EmptySymptoms,
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("file too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api returned status {0}")]
    Api(StatusCode),
}

/// An image destined for one of the classification endpoints.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Client-side validation: wrong type or oversize fails here,
    /// inline, with no network call.
    pub fn validate(&self) -> Result<(), ClientError> {
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(ClientError::UnsupportedFileType(self.content_type.clone()));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ClientError::FileTooLarge {
                size: self.bytes.len(),
                max: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }
}

/// Normalized result of an image classification: a predicted label, a
/// label-to-confidence mapping, and free-text insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDiagnosis {
    pub prediction: String,
    pub confidences: BTreeMap<String, f64>,
    pub insights: String,
}

impl ImageDiagnosis {
    /// Confidence of the predicted label.
    pub fn confidence(&self) -> Option<f64> {
        self.confidences.get(&self.prediction).copied()
    }
}

/// Response of `POST /disease/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePrediction {
    pub predicted_disease: String,
    pub confidence: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub precautions: Option<Vec<String>>,
    #[serde(default)]
    pub medications: Option<Vec<String>>,
    #[serde(default)]
    pub diet: Option<Vec<String>>,
    #[serde(default)]
    pub workouts: Option<Vec<String>>,
}

/// The image endpoints do not agree on a response shape: pneumonia
/// returns a flat single-confidence object, tumor and Alzheimer's a
/// per-class confidence map. Both normalize into [`ImageDiagnosis`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawImageResponse {
    Classed {
        #[serde(rename = "predictedClass")]
        predicted_class: String,
        confidences: BTreeMap<String, f64>,
        insights: String,
    },
    Flat {
        prediction: String,
        confidence: f64,
        gemini_analysis: String,
    },
}

impl From<RawImageResponse> for ImageDiagnosis {
    fn from(raw: RawImageResponse) -> Self {
        match raw {
            RawImageResponse::Classed {
                predicted_class,
                confidences,
                insights,
            } => ImageDiagnosis {
                prediction: predicted_class,
                confidences,
                insights,
            },
            RawImageResponse::Flat {
                prediction,
                confidence,
                gemini_analysis,
            } => {
                let mut confidences = BTreeMap::new();
                confidences.insert(prediction.clone(), confidence);
                ImageDiagnosis {
                    prediction,
                    confidences,
                    insights: gemini_analysis,
                }
            }
        }
    }
}

pub struct DiagnosticsClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl DiagnosticsClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    /// Brain tumor classification from an MRI image.
    pub fn classify_tumor(&self, upload: ImageUpload) -> Result<ImageDiagnosis, ClientError> {
        self.post_image("/tumor/classify", upload)
    }

    /// Pneumonia detection from a chest X-ray.
    pub fn predict_pneumonia(&self, upload: ImageUpload) -> Result<ImageDiagnosis, ClientError> {
        self.post_image("/pneumonia/predict", upload)
    }

    /// Alzheimer's staging from a brain scan.
    pub fn analyze_alzheimers(&self, upload: ImageUpload) -> Result<ImageDiagnosis, ClientError> {
        self.post_image("/alzheimers/analyze", upload)
    }

    /// Symptom-based disease prediction.
    pub fn predict_disease(&self, symptoms: &[String]) -> Result<DiseasePrediction, ClientError> {
        if symptoms.is_empty() {
            return Err(ClientError::EmptySymptoms);
        }

        let url = format!("{}/disease/predict", self.base_url);
        tracing::debug!(%url, count = symptoms.len(), "predicting disease from symptoms");

        let response = self
            .http
            .post(url)
            .json(&json!({ "symptoms": symptoms }))
            .send()?;
        if !response.status().is_success() {
            return Err(ClientError::Api(response.status()));
        }
        Ok(response.json()?)
    }

    fn post_image(&self, path: &str, upload: ImageUpload) -> Result<ImageDiagnosis, ClientError> {
        upload.validate()?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, file = %upload.file_name, "uploading image for analysis");

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("file", part);

        let response = self.http.post(url).multipart(form).send()?;
        if !response.status().is_success() {
            return Err(ClientError::Api(response.status()));
        }

        let raw: RawImageResponse = response.json()?;
        Ok(raw.into())
    }
}
