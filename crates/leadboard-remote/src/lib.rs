// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use leadboard_app::{BulkMutator, LeadId, LeadRecord, OwnerId, PickOption, RecordSource};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

const LEADS_PATH: &str = "/leads";
const STATUS_OPTIONS_PATH: &str = "/leads/status-options";
const OWNER_OPTIONS_PATH: &str = "/owners";
const BULK_STATUS_PATH: &str = "/leads/bulk/status";
const BULK_OWNER_PATH: &str = "/leads/bulk/owner";

/// Blocking JSON client for the managed lead backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("backend.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("backend.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "backend.base_url {base_url:?} must use http or https, got {}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Both picker endpoints must answer before the board is usable.
    pub fn ping(&self) -> Result<()> {
        self.fetch_status_options()?;
        self.fetch_owner_options()?;
        Ok(())
    }

    pub fn fetch_leads(&self) -> Result<Vec<LeadRecord>> {
        // Refreshes must never be answered from an intermediate cache.
        let request = self
            .http
            .get(self.url(LEADS_PATH))
            .header(CACHE_CONTROL, "no-cache");
        self.send_json(request, LEADS_PATH, "decode lead list")
    }

    pub fn fetch_status_options(&self) -> Result<Vec<PickOption>> {
        let request = self.http.get(self.url(STATUS_OPTIONS_PATH));
        self.send_json(request, STATUS_OPTIONS_PATH, "decode status options")
    }

    pub fn fetch_owner_options(&self) -> Result<Vec<PickOption>> {
        let request = self.http.get(self.url(OWNER_OPTIONS_PATH));
        self.send_json(request, OWNER_OPTIONS_PATH, "decode owner options")
    }

    pub fn mutate_status(&self, ids: &[LeadId], status: &str) -> Result<()> {
        let request = self
            .http
            .post(self.url(BULK_STATUS_PATH))
            .json(&BulkStatusRequest { ids, status });
        self.send(request, BULK_STATUS_PATH)
    }

    pub fn mutate_owner(&self, ids: &[LeadId], owner_id: &OwnerId) -> Result<()> {
        let request = self
            .http
            .post(self.url(BULK_OWNER_PATH))
            .json(&BulkOwnerRequest { ids, owner_id });
        self.send(request, BULK_OWNER_PATH)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(&self, request: RequestBuilder, path: &str) -> Result<()> {
        debug!(path, "backend request");
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "backend response");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(())
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
        what: &'static str,
    ) -> Result<T> {
        debug!(path, "backend request");
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "backend response");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context(what)
    }
}

impl RecordSource for Client {
    fn fetch_leads(&mut self) -> Result<Vec<LeadRecord>> {
        Client::fetch_leads(self)
    }

    fn fetch_status_options(&mut self) -> Result<Vec<PickOption>> {
        Client::fetch_status_options(self)
    }

    fn fetch_owner_options(&mut self) -> Result<Vec<PickOption>> {
        Client::fetch_owner_options(self)
    }
}

impl BulkMutator for Client {
    fn mutate_status(&mut self, ids: &[LeadId], status: &str) -> Result<()> {
        Client::mutate_status(self, ids, status)
    }

    fn mutate_owner(&mut self, ids: &[LeadId], owner_id: &OwnerId) -> Result<()> {
        Client::mutate_owner(self, ids, owner_id)
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!(
            "{} did not answer in time -- raise [backend].timeout or retry ({})",
            base_url,
            error
        );
    }
    anyhow!(
        "cannot reach {} -- check [backend].base_url and your network ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<Vec<PlatformError>>(body)
        && let Some(first) = parsed.into_iter().find(|error| !error.message.is_empty())
    {
        return match first.error_code {
            Some(code) if !code.is_empty() => anyhow!("{code}: {}", first.message),
            _ => anyhow!("{}", first.message),
        };
    }

    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body)
        && let Some(message) = parsed.message.or(parsed.error)
        && !message.is_empty()
    {
        return anyhow!("{message}");
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), trimmed);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Serialize)]
struct BulkStatusRequest<'a> {
    ids: &'a [LeadId],
    status: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkOwnerRequest<'a> {
    ids: &'a [LeadId],
    owner_id: &'a OwnerId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlatformError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{BulkOwnerRequest, BulkStatusRequest, Client, clean_error_response};
    use anyhow::Result;
    use leadboard_app::{LeadId, OwnerId};
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn new_trims_trailing_slashes() -> Result<()> {
        let client = Client::new("http://localhost:8080/api///", Duration::from_secs(1))?;
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.timeout(), Duration::from_secs(1));
        Ok(())
    }

    #[test]
    fn new_rejects_empty_and_non_http_urls() {
        assert!(Client::new("", Duration::from_secs(1)).is_err());
        let error = Client::new("ftp://example.com", Duration::from_secs(1))
            .expect_err("ftp should be rejected");
        assert!(error.to_string().contains("http or https"));
        let error = Client::new("not a url", Duration::from_secs(1))
            .expect_err("garbage should be rejected");
        assert!(error.to_string().contains("not a valid URL"));
    }

    #[test]
    fn platform_error_array_keeps_code_and_message() {
        let error = clean_error_response(
            StatusCode::BAD_REQUEST,
            r#"[{"message":"unable to obtain exclusive access to this record","errorCode":"UNABLE_TO_LOCK_ROW"}]"#,
        );
        assert_eq!(
            error.to_string(),
            "UNABLE_TO_LOCK_ROW: unable to obtain exclusive access to this record"
        );
    }

    #[test]
    fn message_and_error_envelopes_are_unwrapped() {
        let error = clean_error_response(
            StatusCode::FORBIDDEN,
            r#"{"message":"insufficient access rights"}"#,
        );
        assert_eq!(error.to_string(), "insufficient access rights");

        let error = clean_error_response(StatusCode::UNAUTHORIZED, r#"{"error":"session expired"}"#);
        assert_eq!(error.to_string(), "session expired");
    }

    #[test]
    fn short_plain_bodies_are_kept_and_long_ones_dropped() {
        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(error.to_string(), "server error (502): upstream down");

        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{broken json");
        assert_eq!(error.to_string(), "server returned 500");

        let error = clean_error_response(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(error.to_string(), "server returned 503");
    }

    #[test]
    fn bulk_bodies_serialize_expected_shape() -> Result<()> {
        let ids = vec![LeadId::from("00Q1"), LeadId::from("00Q2")];
        let status = serde_json::to_value(BulkStatusRequest {
            ids: &ids,
            status: "Working - Contacted",
        })?;
        assert_eq!(
            status,
            serde_json::json!({"ids": ["00Q1", "00Q2"], "status": "Working - Contacted"})
        );

        let owner_id = OwnerId::from("005A");
        let owner = serde_json::to_value(BulkOwnerRequest {
            ids: &ids,
            owner_id: &owner_id,
        })?;
        assert_eq!(
            owner,
            serde_json::json!({"ids": ["00Q1", "00Q2"], "ownerId": "005A"})
        );
        Ok(())
    }
}
