//! Client for the marketplace's session-cookie "ajax" endpoints.
//!
//! These are the endpoints the website itself calls. They need a logged-in
//! session: [`UserClient::login`] stores the session cookies in the client's
//! cookie jar and every later call reuses them. Each payload carries a
//! `returnCode`, where anything other than 0 is an error.

pub mod cart;
pub mod links;
pub mod search;
pub mod wanted;

use crate::config::ClientConfig;
use crate::credentials::UserCredentials;
use crate::error::ApiError;
use crate::http::{ClientStats, HttpCore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

// Status block shared by every ajax payload
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReturnStatus {
    #[serde(rename = "returnCode")]
    pub return_code: i64,
    #[serde(rename = "returnMessage")]
    pub return_message: String,
    #[serde(rename = "errorTicket")]
    pub error_ticket: i64,
    // sic
    #[serde(rename = "procssingTime")]
    pub processing_time: i64,
}

impl ReturnStatus {
    pub fn check(&self) -> Result<(), ApiError> {
        check_response(self.return_code, &self.return_message)
    }
}

pub fn check_response(return_code: i64, message: &str) -> Result<(), ApiError> {
    if return_code != 0 {
        return Err(ApiError::ReturnCode {
            code: return_code,
            message: message.to_string(),
        });
    }
    Ok(())
}

pub trait AjaxResponse {
    fn return_status(&self) -> &ReturnStatus;
}

impl AjaxResponse for ReturnStatus {
    fn return_status(&self) -> &ReturnStatus {
        self
    }
}

#[derive(Debug, Clone)]
pub struct UserClient {
    http: HttpCore,
    credentials: UserCredentials,
}

impl UserClient {
    pub fn new(config: ClientConfig, credentials: &UserCredentials) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpCore::new(config, true)?,
            credentials: credentials.clone(),
        })
    }

    pub fn stats(&self) -> ClientStats {
        self.http.stats()
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    pub async fn login(&self) -> Result<(), ApiError> {
        let url = format!("{}/ajax/renovate/loginandout.ajax", self.config().www_base);
        let form = [
            ("userid", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("keepme_loggedin", "true"),
        ];
        let status: ReturnStatus = self
            .http
            .fetch_json("Login", None, |client| client.post(&url).form(&form))
            .await?;

        if status.return_code != 0 {
            return Err(ApiError::LoginFailed(status.return_message));
        }
        info!(user = %self.credentials.username, "logged in");
        Ok(())
    }

    async fn get_ajax<T>(
        &self,
        url: &str,
        query: &[(&str, String)],
        tag: &str,
        archive_name: Option<&str>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + AjaxResponse,
    {
        let response: T = self
            .http
            .fetch_json(tag, archive_name, |client| client.get(url).query(query))
            .await?;
        response.return_status().check()?;
        Ok(response)
    }

    async fn post_ajax<T>(
        &self,
        url: &str,
        form: &[(&str, String)],
        tag: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + AjaxResponse,
    {
        let response: T = self
            .http
            .fetch_json(tag, None, |client| client.post(url).form(form))
            .await?;
        response.return_status().check()?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::http::mock_server::{CannedResponse, MockServer};

    pub(crate) fn test_client(server: &MockServer) -> UserClient {
        let config = ClientConfig {
            retry_config: RetryConfig::disabled(),
            ..ClientConfig::with_base_url(&server.base_url())
        };
        let credentials = UserCredentials {
            username: "brickfan".to_string(),
            password: "hunter2 & more".to_string(),
        };
        UserClient::new(config, &credentials).unwrap()
    }

    #[test]
    fn test_check_response() {
        assert!(check_response(0, "OK").is_ok());
        let err = check_response(-1, "Invalid request").unwrap_err();
        assert_eq!(err.to_string(), "Return code -1 Invalid request");
    }

    #[tokio::test]
    async fn test_login_posts_form() {
        let server = MockServer::start().await;
        server.route(
            "/ajax/renovate/loginandout.ajax",
            CannedResponse::json(r#"{"returnCode": 0, "returnMessage": "OK", "errorTicket": 0, "procssingTime": 12}"#),
        );

        let client = test_client(&server);
        client.login().await.unwrap();

        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.form_param("userid").as_deref(), Some("brickfan"));
        assert_eq!(
            request.form_param("password").as_deref(),
            Some("hunter2 & more")
        );
        assert_eq!(
            request.form_param("keepme_loggedin").as_deref(),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_login_failure_carries_message() {
        let server = MockServer::start().await;
        server.route(
            "/ajax/renovate/loginandout.ajax",
            CannedResponse::json(r#"{"returnCode": 11, "returnMessage": "Invalid password"}"#),
        );

        let client = test_client(&server);
        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ApiError::LoginFailed(ref m) if m == "Invalid password"));
    }

    #[tokio::test]
    async fn test_session_cookie_is_reused() {
        let server = MockServer::start().await;
        server.route(
            "/ajax/renovate/loginandout.ajax",
            CannedResponse::json(r#"{"returnCode": 0, "returnMessage": "OK"}"#)
                .with_header("Set-Cookie", "BLNEWSESSIONID=abc123; Path=/"),
        );
        server.route(
            "/ajax/renovate/getglobalcart.ajax",
            CannedResponse::json(r#"{"list": [], "total_store_cnt": 0, "total_lot_cnt": 0, "returnCode": 0, "returnMessage": "OK"}"#),
        );

        let client = test_client(&server);
        client.login().await.unwrap();
        client.get_global_cart().await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        let cookie = requests[1].header("cookie").unwrap_or("");
        assert!(cookie.contains("BLNEWSESSIONID=abc123"));
    }
}
