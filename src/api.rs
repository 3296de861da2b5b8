// API client module: a small blocking HTTP client for the verification
// service. Two routes are used: `/verify`, which takes the signed log and
// returns the callsign plus OTP secret, and `/check`, which tells whether a
// code was valid for a callsign at a given time.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::config::Settings;

/// Blocking client holding the reqwest client and the two endpoint URLs.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    verify_url: String,
    check_url: String,
}

/// Successful response of the verify endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub callsign: String,
    pub secret: String,
}

/// The verify call failed. Carries no server detail; a rejected
/// certificate and a network error look the same to the caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    #[error("verification failed")]
    VerificationFailed,
}

/// Answer of the check endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Verified(String),
    Unverified(String),
}

impl CheckOutcome {
    fn from_body(body: String) -> Self {
        if body.trim_end().ends_with(" VERIFIED") {
            CheckOutcome::Verified(body)
        } else {
            CheckOutcome::Unverified(body)
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, CheckOutcome::Verified(_))
    }

    pub fn body(&self) -> &str {
        match self {
            CheckOutcome::Verified(b) | CheckOutcome::Unverified(b) => b,
        }
    }
}

impl ApiClient {
    /// Create an ApiClient pointing at the service configured in `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            verify_url: settings.verify_url(),
            check_url: settings.check_url(),
        })
    }

    pub fn verify_url(&self) -> &str {
        &self.verify_url
    }

    /// POST the raw bytes of a signed log to the verify endpoint. Any
    /// non-2xx status, transport error or unparseable body is reported as
    /// `VerificationFailed`; details only go to the debug log.
    pub fn verify(&self, file_bytes: Vec<u8>) -> Result<VerificationResult, VerificationError> {
        tracing::info!(bytes = file_bytes.len(), url = %self.verify_url, "submitting log for verification");
        let res = self
            .client
            .post(&self.verify_url)
            .body(file_bytes)
            .send()
            .map_err(|e| {
                tracing::debug!("verify request failed: {}", e);
                VerificationError::VerificationFailed
            })?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            tracing::debug!("verify rejected: {} - {}", status, txt);
            return Err(VerificationError::VerificationFailed);
        }
        let resp: VerificationResult = res.json().map_err(|e| {
            tracing::debug!("parsing verify response json: {}", e);
            VerificationError::VerificationFailed
        })?;
        tracing::info!(callsign = %resp.callsign, "verification succeeded");
        Ok(resp)
    }

    /// Read the whole file, then call `verify`. The outer error is an I/O
    /// problem on our side; the inner one is the service's verdict.
    pub fn verify_file(
        &self,
        path: &Path,
    ) -> Result<Result<VerificationResult, VerificationError>> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(self.verify(bytes))
    }

    /// Build `{check}/{CALLSIGN}/{timestamp}/{code}.text`. Each part is one
    /// percent-encoded segment, so portable calls like `VK3FUR/P` stay whole.
    fn check_request_url(
        &self,
        callsign: &str,
        timestamp: DateTime<Utc>,
        code: &str,
    ) -> Result<Url> {
        let mut url = Url::parse(&self.check_url)
            .with_context(|| format!("Invalid check URL {}", self.check_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Check URL {} cannot take a path", self.check_url))?
            .pop_if_empty()
            .push(&callsign.trim().to_uppercase())
            .push(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
            .push(&format!("{}.text", code.trim()));
        Ok(url)
    }

    /// Ask the service whether `code` was valid for `callsign` at `timestamp`.
    pub fn check(
        &self,
        callsign: &str,
        timestamp: DateTime<Utc>,
        code: &str,
    ) -> Result<CheckOutcome> {
        let url = self.check_request_url(callsign, timestamp, code)?;
        tracing::info!(url = %url, "checking code");
        let res = self
            .client
            .get(url)
            .send()
            .context("Failed to send check request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Check failed: {} - {}", status, txt);
        }
        let body = res.text().context("Reading check response body")?;
        Ok(CheckOutcome::from_body(body))
    }
}
