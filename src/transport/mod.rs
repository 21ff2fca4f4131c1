//! Host transport contract.
//!
//! The request object never performs I/O itself: it hands a plain-data
//! [`TransportRequest`] to a [`HostTransport`] and receives a single
//! [`TransportOutcome`] back through a completion callback. The returned
//! [`TransportHandle`] is the only link to the in-flight operation: it
//! carries cooperative cancellation and the headers-received event
//! registration.
//!
//! Contract for implementors:
//!
//! - callbacks are invoked asynchronously relative to `start()`'s return,
//!   never from inside `start()` itself
//! - exactly one `TransportOutcome` is delivered per started request, unless
//!   the operation was cancelled first
//! - the headers-received signal, if fired at all, fires before the outcome

pub mod handle;
pub mod tcp;
pub mod types;

pub use handle::{HeadersSignal, TransportHandle};
pub use tcp::TcpTransport;
pub use types::{
    DecodeMode, RequestBody, ResponseBody, TransportOutcome, TransportRequest, TransportSuccess,
};

/// Completion callback: receives the single tagged outcome of the request.
pub type CompletionFn = Box<dyn FnOnce(TransportOutcome) + Send>;

/// The host-provided request primitive the shim delegates all I/O to.
pub trait HostTransport: Send + Sync {
    /// Starts the request and returns the handle owning the in-flight
    /// operation. `on_complete` is invoked exactly once, asynchronously,
    /// with the tagged outcome.
    fn start(&self, request: TransportRequest, on_complete: CompletionFn) -> TransportHandle;
}
