//! # Tidemark - THE BINARY (library surface)
//!
//! The application crate for the Tidemark snapshot store. The binary in
//! `main.rs` is a thin shell over these modules; they are exposed as a
//! library so integration tests can drive the service layer directly.
//!
//! - [`retry`] - generic linear-backoff retry combinator
//! - [`service`] - async orchestration over an injected store
//! - [`cli`] - clap commands

pub mod cli;
pub mod retry;
pub mod service;
