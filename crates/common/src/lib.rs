//! Flowcheck Common Library
//!
//! Shared types for the flowcheck end-to-end harness: the booking and
//! person records, credentials and tokens, the page-step vocabulary the
//! form flow is written in, and the error taxonomy.

pub mod error;
pub mod selectors;
pub mod steps;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use steps::{Expectation, PageDriver, PageStep, StepResult};
pub use types::{Booking, BookingDates, BookingSummary, Credentials, Person, Token};

/// Flowcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
