//! Protocol-level helpers consumed by the request state machine.
//!
//! Everything here is pure and synchronous:
//!
//! - **`method`**: the HTTP verb allow-list and its case-insensitive parser
//! - **`status`**: the status-code to reason-phrase table
//! - **`url`**: URL canonicalization, including credential embedding

pub mod method;
pub mod status;
pub mod url;
