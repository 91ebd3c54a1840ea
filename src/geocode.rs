use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::sleep;

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(20))
        .user_agent("eventlite/0.1")
        .build()
        .expect("failed to build geocoding client")
});

static REQUEST_QUEUE: Lazy<AsyncMutex<()>> = Lazy::new(|| AsyncMutex::new(()));
static LAST_REQUEST: Lazy<AsyncMutex<Option<Instant>>> = Lazy::new(|| AsyncMutex::new(None));

// Mapbox asks clients to pace geocoding requests.
const RATE_LIMIT_WINDOW_MS: u64 = 1000;

const GEOCODING_ENDPOINT: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("missing mapbox access token")]
    MissingToken,
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    center: Option<Vec<f64>>,
}

pub struct Geocoder {
    token: String,
}

impl Geocoder {
    pub fn new(token: Option<&str>) -> Result<Self, GeocodeError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GeocodeError::MissingToken)?;
        Ok(Self {
            token: token.to_string(),
        })
    }

    /// Forward-geocode an address. `None` means the address is syntactically
    /// fine but Mapbox found nothing for it.
    pub async fn forward(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let mut url =
            Url::parse(GEOCODING_ENDPOINT).map_err(|err| GeocodeError::Http(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GeocodeError::Http("invalid geocoding endpoint".to_string()))?
            .push(&format!("{address}.json"));
        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("limit", "1");

        let text = fetch_payload(url).await?;
        let payload: GeocodingResponse =
            serde_json::from_str(&text).map_err(|err| GeocodeError::Parse(err.to_string()))?;

        let coordinates = payload
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.center)
            .and_then(|center| match center.as_slice() {
                // Mapbox centers are [longitude, latitude].
                [lon, lat, ..] => Some(Coordinates {
                    latitude: *lat,
                    longitude: *lon,
                }),
                _ => None,
            });

        Ok(coordinates)
    }
}

async fn fetch_payload(url: Url) -> Result<String, GeocodeError> {
    let _guard = REQUEST_QUEUE.lock().await;
    wait_for_rate_limit().await;

    let response = CLIENT
        .get(url)
        .send()
        .await
        .map_err(|err| GeocodeError::Http(err.to_string()))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| GeocodeError::Http(err.to_string()))?;

    if !status.is_success() {
        return Err(GeocodeError::Http(format!("status {}: {}", status, text)));
    }

    Ok(text)
}

async fn wait_for_rate_limit() {
    let mut last = LAST_REQUEST.lock().await;
    if let Some(previous) = *last {
        let elapsed = previous.elapsed();
        let window = Duration::from_millis(RATE_LIMIT_WINDOW_MS);
        if elapsed < window {
            sleep(window - elapsed).await;
        }
    }
    *last = Some(Instant::now());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_a_token() {
        assert!(matches!(Geocoder::new(None), Err(GeocodeError::MissingToken)));
        assert!(matches!(
            Geocoder::new(Some("   ")),
            Err(GeocodeError::MissingToken)
        ));
        assert!(Geocoder::new(Some("pk.test")).is_ok());
    }

    #[test]
    fn address_lands_in_the_url_path() {
        let mut url = Url::parse(GEOCODING_ENDPOINT).expect("endpoint");
        url.path_segments_mut()
            .expect("path segments")
            .push("Oxford Rd, M13 9PL.json");
        assert!(url.path().ends_with("Oxford%20Rd,%20M13%209PL.json"));
    }

    #[test]
    fn parses_center_as_lon_lat() {
        let payload: GeocodingResponse = serde_json::from_str(
            r#"{ "features": [ { "center": [-2.2340, 53.4675] } ] }"#,
        )
        .expect("parse payload");
        let center = payload.features[0].center.as_ref().expect("center");
        assert_eq!(center[0], -2.2340);
        assert_eq!(center[1], 53.4675);
    }

    #[test]
    fn empty_feature_list_deserializes() {
        let payload: GeocodingResponse =
            serde_json::from_str(r#"{ "features": [] }"#).expect("parse payload");
        assert!(payload.features.is_empty());
    }
}
