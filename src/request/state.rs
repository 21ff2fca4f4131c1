use std::fmt;

/// Lifecycle stage of a single request.
///
/// States only move forward within one request lifecycle; `abort()` and a
/// renewed `open()` reset to `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// 0 - no request configured
    Uninitialized,
    /// 1 - open() accepted, request headers mutable
    Open,
    /// 2 - reserved by the original interface; never entered
    Send,
    /// 3 - response headers received, body pending
    Receiving,
    /// 4 - response complete
    Loaded,
}

impl ReadyState {
    /// Returns the numeric form exposed by the `XMLHttpRequest` interface.
    ///
    /// # Example
    ///
    /// ```
    /// # use xhr_shim::request::state::ReadyState;
    /// assert_eq!(ReadyState::Uninitialized.as_u16(), 0);
    /// assert_eq!(ReadyState::Loaded.as_u16(), 4);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            ReadyState::Uninitialized => 0,
            ReadyState::Open => 1,
            ReadyState::Send => 2,
            ReadyState::Receiving => 3,
            ReadyState::Loaded => 4,
        }
    }
}

/// Precondition violation: an operation that requires the OPEN state was
/// called elsewhere. Surfaced to the caller, never recovered internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStateError {
    /// The state the object was actually in.
    pub state: ReadyState,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid state: setRequestHeader can only be called while the request is open (state is {})",
            self.state.as_u16()
        )
    }
}

impl std::error::Error for InvalidStateError {}
