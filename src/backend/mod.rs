//! Model service client and wire types
//!
//! Everything that talks to the remote sentiment model lives here:
//! outbound request construction, credential attachment, and
//! classification of the outcome into a reply or a [`BackendError`].

pub mod client;
pub mod error;
pub mod types;

pub use client::{API_KEY_HEADER, ModelBackend, ModelServiceClient};
pub use error::BackendError;
pub use types::{RawPrediction, RawVersion, Reply};
