//! Booking API emulation
//!
//! Reproduces the booking service's surface: `POST /auth` issues a
//! token for the demo credentials, `GET /booking` lists ids,
//! `GET /booking/{id}` returns the full record, `PUT`/`DELETE` replace
//! or remove a record and require the token in a `Cookie` header.
//! Two service quirks are reproduced deliberately: bad credentials
//! answer HTTP 200 with a `reason` body, and `/ping` and `DELETE`
//! answer 201 Created.

use axum::{
    extract::{Path, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use flowcheck_common::{Booking, BookingDates, BookingSummary, Credentials, Error, Result};

/// Shared state of the emulated service
pub struct ApiState {
    credentials: Credentials,
    bookings: RwLock<BTreeMap<u32, Booking>>,
    tokens: RwLock<HashSet<String>>,
}

impl ApiState {
    /// Fresh state with the default demo credentials and seed bookings.
    pub fn seeded() -> Self {
        Self {
            credentials: Credentials::default(),
            bookings: RwLock::new(seed_bookings()),
            tokens: RwLock::new(HashSet::new()),
        }
    }

    async fn token_is_known(&self, headers: &HeaderMap) -> bool {
        let Some(token) = cookie_token(headers) else {
            return false;
        };
        self.tokens.read().await.contains(&token)
    }
}

/// Extract the `token` value from a `Cookie` header, if any.
fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("token="))
        .map(str::to_string)
}

/// Deterministic sample data; the record with id 10 exists by design
/// since the default API flow targets it.
fn seed_bookings() -> BTreeMap<u32, Booking> {
    const GUESTS: [(&str, &str); 10] = [
        ("Sally", "Brown"),
        ("Jim", "Wilson"),
        ("Eric", "Fleming"),
        ("Mark", "Jones"),
        ("Susan", "Ericsson"),
        ("Geoff", "White"),
        ("Mary", "Ericsson"),
        ("John", "Smith"),
        ("Josh", "Allen"),
        ("Marcel", "Mushik"),
    ];

    GUESTS
        .iter()
        .enumerate()
        .map(|(i, (first, last))| {
            let id = i as u32 + 1;
            let checkin = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid seed date")
                + chrono::Days::new(i as u64);
            let booking = Booking {
                firstname: first.to_string(),
                lastname: last.to_string(),
                totalprice: 100 + 25 * i as i64,
                depositpaid: i % 2 == 0,
                bookingdates: BookingDates {
                    checkin,
                    checkout: checkin + chrono::Days::new(3),
                },
                additionalneeds: (i % 3 == 0).then(|| "Breakfast".to_string()),
            };
            (id, booking)
        })
        .collect()
}

/// Build the emulated service's router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/auth", post(create_token))
        .route("/booking", get(list_bookings))
        .route(
            "/booking/:id",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route("/ping", get(ping))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct AuthReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

async fn create_token(
    State(state): State<Arc<ApiState>>,
    Json(credentials): Json<Credentials>,
) -> Json<AuthReply> {
    if credentials != state.credentials {
        warn!(username = %credentials.username, "rejected auth attempt");
        return Json(AuthReply {
            token: None,
            reason: Some("Bad credentials".to_string()),
        });
    }

    let token = Uuid::new_v4().simple().to_string();
    state.tokens.write().await.insert(token.clone());
    debug!("issued token");
    Json(AuthReply {
        token: Some(token),
        reason: None,
    })
}

async fn list_bookings(State(state): State<Arc<ApiState>>) -> Json<Vec<BookingSummary>> {
    let ids = state
        .bookings
        .read()
        .await
        .keys()
        .map(|&bookingid| BookingSummary { bookingid })
        .collect();
    Json(ids)
}

async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u32>,
) -> std::result::Result<Json<Booking>, StatusCode> {
    state
        .bookings
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u32>,
    headers: HeaderMap,
    Json(booking): Json<Booking>,
) -> std::result::Result<Json<Booking>, StatusCode> {
    if !state.token_is_known(&headers).await {
        return Err(StatusCode::FORBIDDEN);
    }

    let mut bookings = state.bookings.write().await;
    if !bookings.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    bookings.insert(id, booking.clone());
    debug!(id, "replaced booking");
    Ok(Json(booking))
}

async fn delete_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u32>,
    headers: HeaderMap,
) -> StatusCode {
    if !state.token_is_known(&headers).await {
        return StatusCode::FORBIDDEN;
    }

    if state.bookings.write().await.remove(&id).is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn ping() -> StatusCode {
    StatusCode::CREATED
}

/// Handle to a running in-process fixture server.
///
/// The server task is aborted on drop; state does not outlive the
/// handle.
pub struct FixtureServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl FixtureServer {
    /// Bind an ephemeral port and serve the emulated booking API.
    pub async fn spawn() -> Result<Self> {
        let state = Arc::new(ApiState::seeded());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| Error::ServerStartup(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| Error::ServerStartup(e.to_string()))?;

        let app = router(state);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("fixture server exited: {e}");
            }
        });

        info!("booking fixture listening on {addr}");
        Ok(Self {
            base_url: format!("http://{addr}"),
            handle,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "session=xyz; token=abc123".parse().unwrap());
        assert_eq!(cookie_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn missing_cookie_yields_no_token() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_token(&headers), None);
    }

    #[test]
    fn seed_contains_the_default_target_booking() {
        let seed = seed_bookings();
        assert_eq!(seed.len(), 10);
        assert!(seed.contains_key(&10));
        for booking in seed.values() {
            assert!(booking.bookingdates.checkin < booking.bookingdates.checkout);
        }
    }
}
