//! Client for the set-catalog web service (ASMX, v2).
//!
//! The service speaks two dialects over the same endpoint:
//!
//! - form-encoded POST to `{endpoint}/{method}`, answered with a bare XML
//!   document such as `<string xmlns="https://brickset.com/api/">value</string>`
//! - SOAP 1.1: an envelope POSTed to `{endpoint}` with a `SOAPAction` header,
//!   answered with `<{method}Result>` inside the SOAP body
//!
//! Every form method expects all of its parameters, empty or not.

use crate::config::ClientConfig;
use crate::credentials::BricksetCredentials;
use crate::error::ApiError;
use crate::http::{ClientStats, HttpCore};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const NAMESPACE: &str = "https://brickset.com/api/";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

// Body of the form-encoded responses
#[derive(Debug, Deserialize)]
#[serde(rename = "string")]
struct StringResponse {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct ArrayOfSets {
    #[serde(rename = "sets", default)]
    sets: Vec<Set>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Set {
    #[serde(rename = "setID")]
    pub set_id: i64,
    pub number: String,
    pub number_variant: i64,
    pub name: String,
    pub year: String,
    pub theme: String,
    pub theme_group: String,
    pub subtheme: String,
    // Empty when unknown
    pub pieces: String,
    pub minifigs: String,
    pub image: bool,
    #[serde(rename = "imageFilename")]
    pub image_filename: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
    #[serde(rename = "largeThumbnailURL")]
    pub large_thumbnail_url: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(rename = "bricksetURL")]
    pub brickset_url: String,
    pub released: bool,
    pub owned: bool,
    pub wanted: bool,
    pub qty_owned: i64,
    pub user_notes: String,
    #[serde(rename = "ACMDataCount")]
    pub acm_data_count: i64,
    pub own_count: i64,
    pub want_count: i64,
    pub instructions_count: i64,
    pub additional_image_count: i64,
    pub age_min: String,
    pub age_max: String,
    pub height: String,
    pub width: String,
    pub depth: String,
    pub weight: String,
    pub category: String,
    pub packaging_type: String,
    pub availability: String,
    #[serde(rename = "EAN")]
    pub ean: String,
    #[serde(rename = "UPC")]
    pub upc: String,
    pub description: String,
    pub last_updated: String,
    pub rating: f64,
    pub review_count: i64,
    #[serde(rename = "USRetailPrice")]
    pub us_retail_price: String,
    #[serde(rename = "UKRetailPrice")]
    pub uk_retail_price: String,
    #[serde(rename = "CARetailPrice")]
    pub ca_retail_price: String,
    #[serde(rename = "EURetailPrice")]
    pub eu_retail_price: String,
}

impl Set {
    pub fn piece_count(&self) -> Option<u32> {
        self.pieces.trim().parse().ok()
    }

    // e.g. "75159-1"
    pub fn full_number(&self) -> String {
        format!("{}-{}", self.number, self.number_variant)
    }
}

/// Filters for `getSets`. Empty strings match everything.
#[derive(Debug, Default, Clone)]
pub struct SetQuery {
    pub user_hash: String,
    pub query: String,
    pub theme: String,
    pub subtheme: String,
    pub set_number: String,
    pub year: String,
    // "1" restricts to sets owned by the user of `user_hash`
    pub owned: String,
    pub wanted: String,
    pub order_by: String,
    pub page_size: String,
    pub page_number: String,
    pub user_name: String,
}

impl SetQuery {
    fn fields<'a>(&'a self, api_key: &'a str) -> [(&'static str, &'a str); 13] {
        [
            ("apiKey", api_key),
            ("userHash", &self.user_hash),
            ("query", &self.query),
            ("theme", &self.theme),
            ("subtheme", &self.subtheme),
            ("setNumber", &self.set_number),
            ("year", &self.year),
            ("owned", &self.owned),
            ("wanted", &self.wanted),
            ("orderBy", &self.order_by),
            ("pageSize", &self.page_size),
            ("pageNumber", &self.page_number),
            ("userName", &self.user_name),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct BricksetClient {
    http: HttpCore,
    credentials: BricksetCredentials,
}

impl BricksetClient {
    pub fn new(config: ClientConfig, credentials: &BricksetCredentials) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpCore::new(config, false)?,
            credentials: credentials.clone(),
        })
    }

    pub fn stats(&self) -> ClientStats {
        self.http.stats()
    }

    fn endpoint(&self) -> String {
        format!("{}/v2.asmx", self.http.config().brickset_base)
    }

    // Returns the user hash needed by the per-user methods
    pub async fn login(&self) -> Result<String, ApiError> {
        let form = [
            ("apiKey", self.credentials.key.as_str()),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];
        let hash = self.call_form_string("login", &form).await?;
        if hash == "INVALIDKEY" || hash.starts_with("ERROR") {
            return Err(ApiError::LoginFailed(hash));
        }
        info!(user = %self.credentials.username, "logged in to brickset");
        Ok(hash)
    }

    pub async fn check_key(&self) -> Result<bool, ApiError> {
        let result = self
            .call_form_string("checkKey", &[("apiKey", self.credentials.key.as_str())])
            .await?;
        Ok(result == "OK")
    }

    // Username the hash belongs to, or None when it has expired
    pub async fn check_user_hash(&self, user_hash: &str) -> Result<Option<String>, ApiError> {
        let result = self
            .call_soap("checkUserHash", &[("userHash", user_hash)])
            .await?;
        if result.is_empty() || result == "invalid" {
            return Ok(None);
        }
        Ok(Some(result))
    }

    pub async fn get_sets(&self, query: &SetQuery) -> Result<Vec<Set>, ApiError> {
        let fields = query.fields(&self.credentials.key);
        let body = self.call_form("getSets", &fields).await?;
        let sets: ArrayOfSets =
            quick_xml::de::from_str(&body).map_err(|e| ApiError::XmlParseError(e.to_string()))?;
        debug!(count = sets.sets.len(), "decoded sets");
        Ok(sets.sets)
    }

    async fn call_form(&self, method: &str, form: &[(&str, &str)]) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.endpoint(), method);
        let body = self
            .http
            .execute(method, |client| {
                client
                    .post(&url)
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .form(form)
            })
            .await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn call_form_string(&self, method: &str, form: &[(&str, &str)]) -> Result<String, ApiError> {
        let body = self.call_form(method, form).await?;
        parse_string_response(&body)
    }

    // Invoke `method` through a SOAP envelope and return the text of its result element
    pub async fn call_soap(&self, method: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let envelope = soap_envelope(method, params);
        let action = format!("{}{}", NAMESPACE, method);
        let url = self.endpoint();
        let body = self
            .http
            .execute(method, |client| {
                client
                    .post(&url)
                    .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
                    .header("SOAPAction", action.as_str())
                    .body(envelope.clone())
            })
            .await?;
        soap_result(&String::from_utf8_lossy(&body), method)
    }
}

fn parse_string_response(body: &str) -> Result<String, ApiError> {
    let response: StringResponse =
        quick_xml::de::from_str(body).map_err(|e| ApiError::XmlParseError(e.to_string()))?;
    Ok(response.value.trim().to_string())
}

pub fn soap_envelope(method: &str, params: &[(&str, &str)]) -> String {
    let mut fields = String::new();
    for (name, value) in params {
        fields.push_str(&format!("<{0}>{1}</{0}>", name, escape(*value)));
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
            r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
            r#"xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><{method} xmlns="{ns}">{fields}</{method}></soap:Body>"#,
            r#"</soap:Envelope>"#
        ),
        method = method,
        ns = NAMESPACE,
        fields = fields
    )
}

// Text of the first `<{method}Result>` element, whatever its prefix
pub fn soap_result(xml: &str, method: &str) -> Result<String, ApiError> {
    let target = format!("{}Result", method);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == target.as_bytes() => {
                let txt = reader
                    .read_text(e.name())
                    .map_err(|e| ApiError::XmlParseError(e.to_string()))?;
                let raw = format!("{}", txt);
                return unescape(&raw)
                    .map(|s| s.trim().to_string())
                    .map_err(|e| ApiError::XmlParseError(e.to_string()));
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == target.as_bytes() => {
                return Ok(String::new());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ApiError::XmlParseError(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => (),
        }
    }

    Err(ApiError::XmlParseError(format!("no <{}> element", target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::http::mock_server::{CannedResponse, MockServer};

    fn test_client(server: &MockServer) -> BricksetClient {
        let config = ClientConfig {
            retry_config: RetryConfig::disabled(),
            ..ClientConfig::with_base_url(&server.base_url())
        };
        let credentials = BricksetCredentials {
            username: "builder".to_string(),
            password: "secret".to_string(),
            key: "key-123".to_string(),
        };
        BricksetClient::new(config, &credentials).unwrap()
    }

    const SETS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ArrayOfSets xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns="https://brickset.com/api/">
  <sets>
    <setID>26049</setID>
    <number>75159</number>
    <numberVariant>1</numberVariant>
    <name>Death Star</name>
    <year>2016</year>
    <theme>Star Wars</theme>
    <subtheme>Ultimate Collector Series</subtheme>
    <pieces>4016</pieces>
    <minifigs>23</minifigs>
    <image>true</image>
    <released>true</released>
    <owned>true</owned>
    <wanted>false</wanted>
    <qtyOwned>1</qtyOwned>
    <userNotes />
    <rating>4.4</rating>
  </sets>
  <sets>
    <setID>1</setID>
    <number>1</number>
    <numberVariant>1</numberVariant>
    <name>Promo pack</name>
    <year>1999</year>
    <pieces></pieces>
  </sets>
</ArrayOfSets>"#;

    #[test]
    fn test_parse_string_response() {
        let value =
            parse_string_response(r#"<string xmlns="https://brickset.com/api/">test</string>"#)
                .unwrap();
        assert_eq!(value, "test");
    }

    #[test]
    fn test_soap_envelope_escapes_values() {
        let envelope = soap_envelope("login", &[("apiKey", "k"), ("password", "a<b&c")]);
        assert!(envelope.contains(r#"<login xmlns="https://brickset.com/api/">"#));
        assert!(envelope.contains("<apiKey>k</apiKey>"));
        assert!(envelope.contains("<password>a&lt;b&amp;c</password>"));
        assert!(envelope.ends_with("</login></soap:Body></soap:Envelope>"));
    }

    #[test]
    fn test_soap_result() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <checkUserHashResponse xmlns="https://brickset.com/api/">
      <checkUserHashResult>builder</checkUserHashResult>
    </checkUserHashResponse>
  </soap:Body>
</soap:Envelope>"#;
        assert_eq!(soap_result(xml, "checkUserHash").unwrap(), "builder");
        assert!(soap_result(xml, "login").is_err());
    }

    #[tokio::test]
    async fn test_login_uses_form_transport() {
        let server = MockServer::start().await;
        server.route(
            "/api/v2.asmx/login",
            CannedResponse::xml(
                r#"<?xml version="1.0" encoding="utf-8"?><string xmlns="https://brickset.com/api/">AbCdEf123</string>"#,
            ),
        );

        let client = test_client(&server);
        assert_eq!(client.login().await.unwrap(), "AbCdEf123");

        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.form_param("apiKey").as_deref(), Some("key-123"));
        assert_eq!(request.form_param("username").as_deref(), Some("builder"));
        assert_eq!(request.form_param("password").as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        server.route(
            "/api/v2.asmx/login",
            CannedResponse::xml(r#"<string xmlns="https://brickset.com/api/">ERROR: invalid username and/or password</string>"#),
        );

        let client = test_client(&server);
        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ApiError::LoginFailed(ref m) if m.starts_with("ERROR")));
    }

    #[tokio::test]
    async fn test_check_user_hash_uses_soap() {
        let server = MockServer::start().await;
        server.route(
            "/api/v2.asmx",
            CannedResponse::xml(
                r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>
                   <checkUserHashResponse xmlns="https://brickset.com/api/"><checkUserHashResult>invalid</checkUserHashResult></checkUserHashResponse>
                   </soap:Body></soap:Envelope>"#,
            ),
        );

        let client = test_client(&server);
        assert_eq!(client.check_user_hash("stale").await.unwrap(), None);

        let request = &server.requests()[0];
        assert_eq!(
            request.header("soapaction"),
            Some("https://brickset.com/api/checkUserHash")
        );
        assert!(request.body.contains("<userHash>stale</userHash>"));
    }

    #[tokio::test]
    async fn test_get_sets() {
        let server = MockServer::start().await;
        server.route("/api/v2.asmx/getSets", CannedResponse::xml(SETS_XML));

        let client = test_client(&server);
        let query = SetQuery {
            set_number: "75159-1".to_string(),
            ..SetQuery::default()
        };
        let sets = client.get_sets(&query).await.unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].full_number(), "75159-1");
        assert_eq!(sets[0].piece_count(), Some(4016));
        assert!(sets[0].owned);
        assert_eq!(sets[0].rating, 4.4);
        assert_eq!(sets[1].piece_count(), None);

        let request = &server.requests()[0];
        assert_eq!(request.form_param("setNumber").as_deref(), Some("75159-1"));
        // every parameter is sent, even when empty
        assert_eq!(request.form_param("theme").as_deref(), Some(""));
    }
}
