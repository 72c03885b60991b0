//! Resilience patterns for legalease-runtime.
//!
//! Every remote call goes through [`WithFallback`]: a bounded attempt whose
//! failure is turned into a locally built substitute. There is no retry and
//! no circuit state; each call is independent.

mod fallback;

pub use fallback::{RemoteFailure, Resolved, WithFallback};
