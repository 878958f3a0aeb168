use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversions of large sheets can take a while on a cold service
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Error)]
pub enum DxfError {
    #[error("request to the DXF service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("DXF service responded with HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("DXF conversion failed: {0}")]
    Rejected(String),
    #[error("DXF service reported success without a converted_dxf_path")]
    MissingPath,
}

/// Body of a conversion request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConvertRequest {
    pub svg_url: String,
}

/// Body of a conversion response, on success `status` is `"success"`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConvertResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_dxf_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

/// Async client of the conversion service, requests are not retried.
#[derive(Debug, Clone)]
pub struct DxfConverter {
    client: reqwest::Client,
    service_url: String,
}

impl DxfConverter {
    pub fn new(service_url: &str) -> Result<Self, DxfError> {
        Self::with_timeout(service_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(service_url: &str, timeout: Duration) -> Result<Self, DxfError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            service_url: service_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Converts the SVG at `svg_url` and returns the path of the stored DXF
    pub async fn convert(&self, svg_url: &str) -> Result<String, DxfError> {
        let endpoint = format!("{}/convert", self.service_url);
        debug!("[DXF] POST {endpoint} for {svg_url}");

        let request = ConvertRequest {
            svg_url: svg_url.to_string(),
        };
        let response = self.client.post(&endpoint).json(&request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        match interpret_response(status, &body) {
            Ok(path) => {
                info!("[DXF] converted {svg_url} to {path}");
                Ok(path)
            }
            Err(e) => {
                warn!("[DXF] conversion of {svg_url} failed: {e}");
                Err(e)
            }
        }
    }
}

/// Maps an HTTP status and body of the conversion service to the path of the converted DXF.
///
/// Non-2xx responses carry the service's `error` field as detail when the body is JSON, the raw body
/// otherwise. A 2xx response is only a success if its `status` field says so.
pub fn interpret_response(status: u16, body: &str) -> Result<String, DxfError> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").map(error_detail))
            .unwrap_or_else(|| body.trim().to_string());
        return Err(DxfError::Status { status, detail });
    }

    let response: ConvertResponse = serde_json::from_str(body)
        .map_err(|e| DxfError::Rejected(format!("unreadable response ({e}): {}", body.trim())))?;

    match response.status.as_str() {
        SUCCESS_STATUS => response
            .converted_dxf_path
            .filter(|p| !p.is_empty())
            .ok_or(DxfError::MissingPath),
        other => {
            let detail = response
                .error
                .as_ref()
                .map(error_detail)
                .unwrap_or_else(|| format!("status {other}"));
            Err(DxfError::Rejected(detail))
        }
    }
}

fn error_detail(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        v => v.to_string(),
    }
}
