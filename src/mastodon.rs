use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Event, Venue};

#[derive(Debug, Error)]
pub enum MastodonError {
    #[error("missing mastodon instance")]
    MissingInstance,
    #[error("missing mastodon access token")]
    MissingToken,
    #[error("http error: {0}")]
    Http(String),
    #[error("mastodon api error: {0}")]
    Api(String),
}

pub struct StatusPoster {
    instance: String,
    token: String,
}

impl StatusPoster {
    pub fn from_config(config: &AppConfig) -> Result<Self, MastodonError> {
        let instance = config
            .mastodon_instance
            .as_ref()
            .ok_or(MastodonError::MissingInstance)?
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();
        if instance.is_empty() {
            return Err(MastodonError::MissingInstance);
        }

        let token = config
            .mastodon_access_token
            .as_ref()
            .ok_or(MastodonError::MissingToken)?
            .trim()
            .to_string();
        if token.is_empty() {
            return Err(MastodonError::MissingToken);
        }

        Ok(Self { instance, token })
    }

    /// Posts a status and returns the created status id.
    pub async fn post(&self, status: &str) -> Result<String, MastodonError> {
        let client = reqwest::Client::new();
        let url = format!("https://{}/api/v1/statuses", self.instance);

        let response = client
            .post(url)
            .bearer_auth(&self.token)
            .form(&[("status", status)])
            .send()
            .await
            .map_err(|err| MastodonError::Http(err.to_string()))?;

        let status_code = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| MastodonError::Http(err.to_string()))?;

        if !status_code.is_success() {
            return Err(MastodonError::Api(body.to_string()));
        }

        let id = body
            .get("id")
            .and_then(|val| val.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown_status_id".to_string());

        Ok(id)
    }
}

/// Announcement text for an event, used as the cross-posted status body.
pub fn compose_status(event: &Event, venue: Option<&Venue>) -> String {
    let when = match event.time {
        Some(time) => format!(
            "{} at {}",
            event.date.format("%A, %B %e"),
            time.format("%H:%M")
        ),
        None => event.date.format("%A, %B %e").to_string(),
    };

    let mut lines = vec![event.name.clone()];
    if let Some(venue) = venue {
        lines.push(format!("Venue: {}", venue.name));
    }
    lines.push(format!("When: {when}"));
    if let Some(description) = event
        .description
        .as_ref()
        .filter(|text| !text.trim().is_empty())
    {
        lines.push(description.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(instance: Option<&str>, token: Option<&str>) -> AppConfig {
        AppConfig {
            mapbox_access_token: None,
            mastodon_instance: instance.map(str::to_string),
            mastodon_access_token: token.map(str::to_string),
        }
    }

    #[test]
    fn poster_requires_instance_and_token() {
        assert!(matches!(
            StatusPoster::from_config(&config(None, Some("token"))),
            Err(MastodonError::MissingInstance)
        ));
        assert!(matches!(
            StatusPoster::from_config(&config(Some("mstdn.example"), None)),
            Err(MastodonError::MissingToken)
        ));
        assert!(matches!(
            StatusPoster::from_config(&config(Some("  "), Some("token"))),
            Err(MastodonError::MissingInstance)
        ));
        assert!(StatusPoster::from_config(&config(Some("mstdn.example"), Some("token"))).is_ok());
    }

    #[test]
    fn instance_scheme_and_trailing_slash_are_stripped() {
        let poster =
            StatusPoster::from_config(&config(Some("https://mstdn.example/"), Some("token")))
                .expect("poster");
        assert_eq!(poster.instance, "mstdn.example");
    }

    #[test]
    fn composes_status_with_venue_and_time() {
        let event = Event {
            id: 1,
            name: "Summer Concert".to_string(),
            date: "2025-07-11".parse().expect("date"),
            time: chrono::NaiveTime::from_hms_opt(12, 30, 0),
            venue_id: Some(2),
            description: Some("Open air.".to_string()),
        };
        let venue = Venue {
            id: 2,
            name: "Kilburn Building".to_string(),
            capacity: 100,
            address: "Oxford Rd, M13 9PL".to_string(),
            latitude: None,
            longitude: None,
        };

        let status = compose_status(&event, Some(&venue));
        assert!(status.starts_with("Summer Concert\n"));
        assert!(status.contains("Venue: Kilburn Building"));
        assert!(status.contains("at 12:30"));
        assert!(status.ends_with("Open air."));
    }

    #[test]
    fn composes_status_without_venue_or_time() {
        let event = Event {
            id: 1,
            name: "Open Day".to_string(),
            date: "2025-07-12".parse().expect("date"),
            time: None,
            venue_id: None,
            description: None,
        };

        let status = compose_status(&event, None);
        assert_eq!(status.lines().count(), 2);
        assert!(!status.contains("Venue:"));
    }
}
