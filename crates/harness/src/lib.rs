//! Flowcheck harness
//!
//! Two stateless end-to-end flows against externally owned
//! collaborators, each a linear sequence of request/assert or
//! interact/assert steps:
//!
//! - [`flows::api::ApiFlow`] — authenticate, read a booking collection
//!   and a single record, mutate one field via a token-authenticated
//!   `PUT`, re-read and assert the mutation.
//! - [`flows::form::FormFlow`] — drive the web-tables modal form
//!   through a valid submission, an empty submission, and a
//!   malformed-email submission, asserting the resulting DOM state.
//!
//! The flows lean entirely on injected capabilities: a
//! [`api::BookingClient`] for the request/response side and a
//! [`flowcheck_common::PageDriver`] for the page side. [`runner::FlowRunner`]
//! orchestrates scenarios and reports results.

pub mod api;
pub mod browser;
pub mod flows;
pub mod runner;

pub use api::BookingClient;
pub use browser::BrowserDriver;
pub use flows::{api::ApiFlow, form::FormFlow};
pub use runner::{FlowResult, FlowRunner, SuiteResult};
