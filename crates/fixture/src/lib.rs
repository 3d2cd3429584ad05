//! Flowcheck fixtures
//!
//! The flows target externally owned collaborators: a booking REST API
//! and a web page with a modal form. This crate emulates both so the
//! harness can run hermetically:
//!
//! - [`booking`] — an in-process axum server reproducing the booking
//!   API surface (token auth, collection/record reads, token-guarded
//!   mutation).
//! - [`webtables`] — an in-process model of the web-tables page that
//!   interprets the harness's step vocabulary and honors the form's
//!   state machine (`Closed -> Open -> {Committed | Open+Invalid} -> Closed`).
//!
//! Fixture state is ephemeral: it lives for one server instance or one
//! page load, matching the remote collaborators' per-run semantics.

pub mod booking;
pub mod webtables;

pub use booking::FixtureServer;
pub use webtables::WebTablesPage;
