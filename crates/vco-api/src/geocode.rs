// Geocoding lookup
//
// Thin wrapper over the Google geocoding API. Only the first (best) match
// is used; an empty result set is an error, never a default location.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Public endpoint of the Google geocoding API.
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// A resolved coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Client for address → coordinate lookups.
pub struct GeocodeClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
}

impl GeocodeClient {
    /// Client against the public Google endpoint.
    pub fn new(api_key: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let endpoint = Url::parse(GOOGLE_GEOCODE_URL)?;
        Ok(Self::with_client(transport.build_client()?, endpoint, api_key))
    }

    /// Client against an arbitrary endpoint with a caller-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url, api_key: SecretString) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    /// Resolve a postal code within a country to the best-match coordinates.
    pub async fn lookup(&self, postal_code: &str, country: &str) -> Result<LatLon, Error> {
        let address = format!("{postal_code},{country}");
        debug!(%address, "geocoding");

        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("address", address.as_str()),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Geocode {
                status: status.to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body.clone()))?;

        match parsed.status.as_deref() {
            None | Some("OK" | "ZERO_RESULTS") => {}
            Some(other) => {
                return Err(Error::Geocode {
                    status: other.to_owned(),
                    message: parsed.error_message.unwrap_or_default(),
                });
            }
        }

        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or(Error::GeocodeNoResults { address })?;
        Ok(LatLon {
            lat: first.geometry.location.lat,
            lon: first.geometry.location.lng,
        })
    }
}
