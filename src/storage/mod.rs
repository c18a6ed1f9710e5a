//! Filesystem persistence for form submissions and quote documents
//!
//! Everything lives below a configurable data root; no other state is kept.

pub mod error;
pub mod ids;
pub mod quotes;
pub mod record;
pub mod submissions;

pub use error::StorageError;
pub use quotes::QuoteStore;
pub use record::{SubmissionRecord, BOOKING_REQUIRED_FIELDS, LEAD_REQUIRED_FIELDS};
pub use submissions::{SubmissionLayout, SubmissionStore};
