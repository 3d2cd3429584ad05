//! API scenario runner
//!
//! A linear request/assert sequence against the booking service:
//! authenticate, read the collection and the target record, replace the
//! record with a new last name under the token, re-read and assert the
//! mutation landed. The update mutates shared external state; the flow
//! is written so that re-applying the same target value is idempotent.

use std::future::Future;
use std::time::Instant;
use tracing::info;

use flowcheck_common::steps::StepResult;
use flowcheck_common::{Credentials, Error, Result};

use crate::api::BookingClient;

/// Parameters of the API flow. All literal inline data; the defaults
/// are the demo scenario's values.
#[derive(Debug, Clone)]
pub struct ApiFlow {
    pub credentials: Credentials,
    pub booking_id: u32,
    pub new_last_name: String,
}

impl Default for ApiFlow {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            booking_id: 10,
            new_last_name: "HolyOne".to_string(),
        }
    }
}

impl ApiFlow {
    /// Run the flow. The first failing step ends the run; its failure
    /// is recorded in the returned results.
    pub async fn run(&self, client: &BookingClient) -> Result<Vec<StepResult>> {
        let mut results = Vec::new();

        let Some(token) = step(&mut results, "auth", client.authenticate(&self.credentials)).await
        else {
            return Ok(results);
        };
        info!("obtained token");

        let Some(ids) = step(&mut results, "list-bookings", client.booking_ids()).await else {
            return Ok(results);
        };
        info!(count = ids.len(), "fetched booking collection");

        let target = self.booking_id;
        let found = step(&mut results, "collection-contains-target", async {
            if ids.iter().any(|entry| entry.bookingid == target) {
                Ok(())
            } else {
                Err(Error::AssertionFailed(format!(
                    "booking {target} not present in the collection"
                )))
            }
        })
        .await;
        if found.is_none() {
            return Ok(results);
        }

        let Some(mut booking) =
            step(&mut results, "fetch-booking", client.booking(self.booking_id)).await
        else {
            return Ok(results);
        };
        info!(lastname = %booking.lastname, "last name before change");

        booking.lastname = self.new_last_name.clone();
        let updated = step(
            &mut results,
            "update-lastname",
            client.update_booking(self.booking_id, &booking, &token),
        )
        .await;
        if updated.is_none() {
            return Ok(results);
        }

        let new_last_name = self.new_last_name.clone();
        let client_ref = client;
        let id = self.booking_id;
        step(&mut results, "verify-lastname", async move {
            let reread = client_ref.booking(id).await?;
            info!(lastname = %reread.lastname, "last name after change");
            if reread.lastname == new_last_name {
                Ok(())
            } else {
                Err(Error::AssertionFailed(format!(
                    "expected last name {new_last_name:?}, found {:?}",
                    reread.lastname
                )))
            }
        })
        .await;

        Ok(results)
    }
}

/// Time one flow step and record its outcome; `None` aborts the flow.
async fn step<T>(
    results: &mut Vec<StepResult>,
    name: &str,
    fut: impl Future<Output = Result<T>>,
) -> Option<T> {
    let start = Instant::now();
    match fut.await {
        Ok(value) => {
            results.push(StepResult::ok(name, start.elapsed()));
            Some(value)
        }
        Err(e) => {
            results.push(StepResult::failed(name, start.elapsed(), e));
            None
        }
    }
}
