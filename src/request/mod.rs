//! Request lifecycle state machine.
//!
//! This module implements the `XMLHttpRequest`-shaped object itself: guarded
//! field mutation, readyState transitions, and the translation between the
//! host transport's callback-based result and the polling-accessor surface.
//!
//! # Request State Machine
//!
//! Each request object moves through a state machine:
//!
//! ```text
//!        ┌───────────────┐
//!        │ UNINITIALIZED │ ← fresh object, or reset via abort()
//!        └───────┬───────┘
//!                │ open() accepted
//!                ▼
//!        ┌───────────────┐
//!        │     OPEN      │ ← headers mutable, send() allowed
//!        └───────┬───────┘
//!                │ transport reports headers received
//!                ▼
//!        ┌───────────────┐
//!        │   RECEIVING   │
//!        └───────┬───────┘
//!                │ transport success
//!                ▼
//!        ┌───────────────┐
//!        │    LOADED     │
//!        └───────────────┘
//! ```
//!
//! A transport failure does NOT advance the state: it records `status = 0`
//! and the error message, and callers detect it by polling. `abort()` resets
//! to UNINITIALIZED from anywhere, without firing the change notification.

pub mod state;
pub mod xhr;

pub use state::{InvalidStateError, ReadyState};
pub use xhr::XmlHttpRequest;
