//! Client for the marketplace's OAuth-signed store REST API.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "meta": { "description": "OK", "message": "OK", "code": 200 }, "data": ... }
//! ```
//!
//! A `meta.code` outside the 2xx range is reported as [`ApiError::MetaStatus`]
//! even when the HTTP status itself was 200.

pub mod catalog;
pub mod color;
pub mod oauth;
pub mod order;

use crate::config::ClientConfig;
use crate::credentials::StoreCredentials;
use crate::error::ApiError;
use crate::http::{ClientStats, HttpCore};
use oauth::OAuthSigner;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    // Orders received as a seller
    In,
    // Orders placed as a buyer
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => f.write_str("in"),
            Direction::Out => f.write_str("out"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            _ => Err(format!("direction must be `in` or `out`, got `{}`", s)),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub description: String,
    pub message: String,
    pub code: i64,
}

impl Meta {
    pub fn check(&self) -> Result<(), ApiError> {
        if self.code / 100 != 2 {
            return Err(ApiError::MetaStatus {
                code: self.code,
                message: self.message.clone(),
                description: self.description.clone(),
            });
        }
        Ok(())
    }
}

// `data` stays raw until `meta` has been checked; error responses carry `{}`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    meta: Meta,
    data: Option<serde_json::Value>,
}

impl Envelope {
    fn into_data<T: DeserializeOwned>(self, tag: &str) -> Result<T, ApiError> {
        self.meta.check()?;
        let data = self.data.ok_or_else(|| ApiError::JsonParseError {
            tag: tag.to_string(),
            message: "response has no data".to_string(),
        })?;
        serde_json::from_value(data).map_err(|e| ApiError::JsonParseError {
            tag: tag.to_string(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct StoreClient {
    http: HttpCore,
    signer: OAuthSigner,
}

impl StoreClient {
    pub fn new(config: ClientConfig, credentials: &StoreCredentials) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpCore::new(config, false)?,
            signer: OAuthSigner::new(credentials),
        })
    }

    pub fn stats(&self) -> ClientStats {
        self.http.stats()
    }

    // Signed GET of `path` under the API base; query parameters are part of the signature
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        tag: &str,
        archive_name: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.http.config().store_api_base, path);
        let params: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        debug!(tag, %url, "store request");

        let envelope: Envelope = self
            .http
            .fetch_json(tag, Some(archive_name), |client| {
                let header = self.signer.authorization_header("GET", &url, &params);
                client
                    .get(&url)
                    .query(&params)
                    .header(AUTHORIZATION, header)
            })
            .await?;
        envelope.into_data(tag)
    }
}
