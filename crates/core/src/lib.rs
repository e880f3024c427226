//! # iiwake Core
//!
//! Domain types, traits, and error definitions for the iiwake lateness-excuse
//! generator. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! The pipeline is strictly sequential: an [`ExcuseRequest`] is turned into a
//! prompt, the prompt goes to a [`CompletionProvider`], and the completion
//! text is parsed into [`Candidate`]s which are ranked down to at most three
//! [`RankedReason`]s. Candidates live only for the duration of one request.

pub mod candidate;
pub mod error;
pub mod provider;
pub mod request;

// Re-export key types at crate root for ergonomics
pub use candidate::{Candidate, RankedReason};
pub use error::{Error, ParseError, ProviderError, Result};
pub use provider::{CompletionProvider, CompletionRequest, CompletionResponse, Usage};
pub use request::ExcuseRequest;
