//! Core types and trait definitions for the voxprint voice-profile store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod draft;
pub mod persona;
pub mod record;
pub mod review;
pub mod sample;
pub mod store;
pub mod suppress;
