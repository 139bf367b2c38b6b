//! Caller-side fallback client.
//!
//! # State Machine (per call)
//! ```text
//! START → DIRECT_ATTEMPT ─┬─ 2xx ────────────→ SUCCESS
//!                         ├─ 429/403/503 ────→ PROXY_ATTEMPT ─┬─→ SUCCESS
//!                         │                                   └─→ FAIL
//!                         └─ other non-2xx ──→ FAIL
//! ```
//!
//! The two legs are strictly sequential and there is no retry within a leg.

pub mod client;
pub mod outcome;

pub use client::FallbackClient;
pub use outcome::{is_blocking, DirectOutcome, BLOCKING_STATUSES};
