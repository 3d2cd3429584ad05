//! Booking API client
//!
//! A thin reqwest wrapper over the booking service's endpoints. Every
//! call is one blocking-style request; non-2xx responses map to
//! [`Error::UnexpectedStatus`] and abort the calling flow. Mutating
//! calls attach the token via a `Cookie` header, the way the service
//! expects it.

use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::Response;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use flowcheck_common::{Booking, BookingSummary, Credentials, Error, Result, Token};

/// Client for one booking service instance.
#[derive(Debug, Clone)]
pub struct BookingClient {
    http: reqwest::Client,
    base_url: String,
}

/// The auth endpoint answers HTTP 200 either way; failure carries a
/// `reason` instead of a `token`.
#[derive(Deserialize)]
struct AuthReply {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl BookingClient {
    /// Create a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /auth` — exchange credentials for a token.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Token> {
        let url = format!("{}/auth", self.base_url);
        let response = self.http.post(&url).json(credentials).send().await?;
        let reply: AuthReply = ensure_success(response).await?.json().await?;

        match reply.token.and_then(Token::new) {
            Some(token) => Ok(token),
            None => Err(Error::AuthFailed(
                reply.reason.unwrap_or_else(|| "no token in response".to_string()),
            )),
        }
    }

    /// `GET /booking` — the collection, ids only.
    pub async fn booking_ids(&self) -> Result<Vec<BookingSummary>> {
        let url = format!("{}/booking", self.base_url);
        let response = self.http.get(&url).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// `GET /booking/{id}` — one full record.
    pub async fn booking(&self, id: u32) -> Result<Booking> {
        let url = format!("{}/booking/{id}", self.base_url);
        let response = self.http.get(&url).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// `PUT /booking/{id}` — wholesale record replace, token-guarded.
    pub async fn update_booking(&self, id: u32, booking: &Booking, token: &Token) -> Result<Booking> {
        let url = format!("{}/booking/{id}", self.base_url);
        debug!(id, "replacing booking");
        let response = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(COOKIE, token.cookie())
            .json(booking)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// `DELETE /booking/{id}` — token-guarded removal.
    pub async fn delete_booking(&self, id: u32, token: &Token) -> Result<()> {
        let url = format!("{}/booking/{id}", self.base_url);
        debug!(id, "deleting booking");
        let response = self
            .http
            .delete(&url)
            .header(COOKIE, token.cookie())
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// `GET /ping` — the service's health probe.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/ping", self.base_url);
        let response = self.http.get(&url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Poll `/ping` until the service answers, up to `attempts` tries.
    pub async fn wait_until_ready(&self, attempts: usize) -> Result<()> {
        for attempt in 1..=attempts {
            match self.ping().await {
                Ok(()) => return Ok(()),
                Err(e) => debug!(attempt, "service not ready yet: {e}"),
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Err(Error::ServerHealthCheck(attempts))
    }
}

/// Map a non-2xx response to [`Error::UnexpectedStatus`].
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = BookingClient::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }
}
