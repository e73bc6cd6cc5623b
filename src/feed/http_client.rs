//! Signed HTTP access to the feed backend.
//!
//! Every request carries an HMAC-SHA1 signature over the request shape, keyed
//! by the configured API key, alongside client-version headers. The backend
//! rejects unsigned traffic.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::app::{GazetteError, Result};
use crate::config::KeyConfig;
use crate::domain::{Coordinates, Location};
use crate::feed::{FeedClient, Karma, RecentPosts};

const DEFAULT_API_BASE: &str = "https://api.go-tellm.com/api";
const CLIENT_ID: &str = "81e8a76e-1e02-4d17-9ba0-8a7020261b26";

type HmacSha1 = Hmac<Sha1>;

pub struct HttpFeedClient {
    client: Client,
    base_url: String,
    host: String,
    keys: KeyConfig,
    device_uid: String,
    access_token: Option<String>,
}

impl HttpFeedClient {
    pub fn new(device_uid: String, keys: KeyConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(format!("Jodel/{} (Android)", keys.client_version))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: DEFAULT_API_BASE.to_string(),
            host: host_of(DEFAULT_API_BASE),
            keys,
            device_uid,
            access_token: None,
        }
    }

    /// Point the client at a different backend. Used in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.host = host_of(&self.base_url);
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Signature over the request shape, as the backend verifies it.
    fn sign(&self, method: &Method, path: &str, timestamp: &str, query: &str, body: &str) -> Result<String> {
        let token = self.access_token.as_deref().unwrap_or("");
        let raw = [
            method.as_str(),
            self.host.as_str(),
            "443",
            path,
            token,
            timestamp,
            query,
            body,
        ]
        .join("%");

        let mut mac = HmacSha1::new_from_slice(self.keys.key.as_bytes())
            .map_err(|_| GazetteError::Auth("invalid signing key".to_string()))?;
        mac.update(raw.as_bytes());
        Ok(hex::encode_upper(mac.finalize().into_bytes()))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<String>,
        body: Option<String>,
    ) -> Result<T> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let query = query.unwrap_or_default();
        let body = body.unwrap_or_default();
        let signature = self.sign(&method, path, &timestamp, &query, &body)?;

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let mut request = self
            .client
            .request(method, &url)
            .header("X-Authorization", format!("HMAC {signature}"))
            .header("X-Timestamp", timestamp)
            .header("X-Client-Type", format!("android_{}", self.keys.client_version))
            .header("X-Api-Version", self.keys.api_version.as_str())
            .header(CONTENT_TYPE, "application/json; charset=UTF-8");

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GazetteError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    fn require_token(&self) -> Result<()> {
        if self.access_token.is_none() {
            return Err(GazetteError::Auth("not logged in".to_string()));
        }
        Ok(())
    }
}

fn host_of(base_url: &str) -> String {
    base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    client_id: &'a str,
    device_uid: &'a str,
    location: WireLocation<'a>,
}

/// The backend's field names for a location differ from the config file's.
#[derive(Serialize)]
struct WireLocation<'a> {
    city: &'a str,
    country: &'a str,
    loc_coordinates: Coordinates,
    loc_accuracy: f64,
}

impl<'a> From<&'a Location> for WireLocation<'a> {
    fn from(location: &'a Location) -> Self {
        Self {
            city: &location.city,
            country: &location.country,
            loc_coordinates: location.coordinates,
            loc_accuracy: location.accuracy,
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn login(&mut self, location: &Location) -> Result<String> {
        let body = serde_json::to_string(&LoginRequest {
            client_id: CLIENT_ID,
            device_uid: &self.device_uid,
            location: location.into(),
        })?;

        let response: LoginResponse = self
            .request(Method::POST, "/v2/users/", None, Some(body))
            .await?;

        self.access_token = Some(response.access_token.clone());
        Ok(response.access_token)
    }

    async fn login_with_token(&mut self, token: &str) -> Result<()> {
        // No validation round trip; a dead token shows up as fetch failures.
        self.access_token = Some(token.to_string());
        Ok(())
    }

    async fn get_karma(&self) -> Result<Karma> {
        self.require_token()?;
        self.request(Method::GET, "/v2/users/karma", None, None).await
    }

    async fn get_most_recent_posts(&self, coordinates: Coordinates) -> Result<RecentPosts> {
        self.require_token()?;
        let query = format!("lat={}&lng={}", coordinates.lat, coordinates.lng);
        self.request(Method::GET, "/v2/posts/location/recent", Some(query), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpFeedClient {
        HttpFeedClient::new("deadbeef".repeat(8), KeyConfig::default())
    }

    #[test]
    fn signature_is_deterministic_hex_sha1() {
        let client = client();
        let a = client
            .sign(&Method::GET, "/v2/users/karma", "2024-05-01T12:00:00Z", "", "")
            .unwrap();
        let b = client
            .sign(&Method::GET, "/v2/users/karma", "2024-05-01T12:00:00Z", "", "")
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 40); // SHA1 digest, hex encoded
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, a.to_uppercase());
    }

    #[test]
    fn signature_covers_the_token() {
        let mut client = client();
        let anonymous = client
            .sign(&Method::GET, "/v2/users/karma", "2024-05-01T12:00:00Z", "", "")
            .unwrap();
        client.access_token = Some("token".to_string());
        let authed = client
            .sign(&Method::GET, "/v2/users/karma", "2024-05-01T12:00:00Z", "", "")
            .unwrap();

        assert_ne!(anonymous, authed);
    }

    #[test]
    fn host_is_extracted_from_base_url() {
        assert_eq!(host_of("https://api.go-tellm.com/api"), "api.go-tellm.com");
        assert_eq!(host_of("http://127.0.0.1:8080/api"), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn calls_without_a_token_are_rejected_locally() {
        let client = client();
        let err = client.get_karma().await.unwrap_err();
        assert!(matches!(err, GazetteError::Auth(_)));
    }

    #[test]
    fn wire_location_uses_backend_field_names() {
        let location = Location {
            city: "Kassel".to_string(),
            country: "DE".to_string(),
            coordinates: Coordinates { lat: 51.335, lng: 9.4947 },
            accuracy: 19.0,
        };
        let wire = serde_json::to_value(WireLocation::from(&location)).unwrap();
        assert!(wire.get("loc_coordinates").is_some());
        assert!(wire.get("loc_accuracy").is_some());
        assert!(wire.get("coordinates").is_none());
    }
}
