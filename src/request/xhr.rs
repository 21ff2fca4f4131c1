use crate::config::Config;
use crate::http::method::Method;
use crate::http::status::reason_phrase;
use crate::http::url::canonicalize;
use crate::request::state::{InvalidStateError, ReadyState};
use crate::transport::handle::TransportHandle;
use crate::transport::types::{
    DecodeMode, RequestBody, ResponseBody, TransportOutcome, TransportRequest,
};
use crate::transport::HostTransport;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

type ChangeHook = Box<dyn FnMut() + Send>;

/// Everything mutable about one request object. Shared with the transport
/// callbacks through the `Arc<Mutex<_>>` in [`XmlHttpRequest`].
struct Inner {
    method: Method,
    url: String,
    is_async: bool,
    ready_state: ReadyState,
    status: u16,
    /// Transport-supplied message on failure; the `statusText` accessor
    /// derives the visible value.
    status_text: String,
    response_type: String,
    request_headers: HashMap<String, String>,
    response_headers: Option<HashMap<String, String>>,
    response: Option<ResponseBody>,
    response_xml: Option<String>,
    body: Option<RequestBody>,
    timeout_ms: f64,
    on_ready_state_change: Option<ChangeHook>,
    start_time: Option<Instant>,
    task: Option<TransportHandle>,
    /// Monotonic per-send counter; callbacks carry the value they were
    /// started with.
    seq: u64,
    /// The send whose callbacks are still welcome. Cleared by completion,
    /// abort, and re-open; stale callbacks compare against it and bail.
    active_seq: Option<u64>,
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Updates the state field and returns the change hook to fire, or `None`
/// when the assignment was not a genuine transition.
fn apply_state(guard: &mut Inner, state: ReadyState) -> Option<ChangeHook> {
    if guard.ready_state == state {
        return None;
    }
    guard.ready_state = state;
    guard.on_ready_state_change.take()
}

/// Runs the hook with the lock released, then puts it back unless the hook
/// itself registered a replacement.
fn fire_change_hook(inner: &Mutex<Inner>, hook: Option<ChangeHook>) {
    if let Some(mut hook) = hook {
        hook();
        let mut guard = lock_inner(inner);
        if guard.on_ready_state_change.is_none() {
            guard.on_ready_state_change = Some(hook);
        }
    }
}

fn set_state(inner: &Mutex<Inner>, state: ReadyState) {
    let hook = apply_state(&mut lock_inner(inner), state);
    fire_change_hook(inner, hook);
}

/// Headers-received hook for send `seq`.
fn headers_received(inner: &Mutex<Inner>, seq: u64) {
    let hook = {
        let mut guard = lock_inner(inner);
        if guard.active_seq != Some(seq) {
            return;
        }
        apply_state(&mut guard, ReadyState::Receiving)
    };
    fire_change_hook(inner, hook);
}

/// Completion callback for send `seq`. A completion arriving after abort or
/// supersession is dropped here.
fn finish(inner: &Mutex<Inner>, seq: u64, outcome: TransportOutcome) {
    let hook = {
        let mut guard = lock_inner(inner);
        if guard.active_seq != Some(seq) {
            return;
        }
        guard.active_seq = None;
        guard.task = None;
        if let Some(started) = guard.start_time.take() {
            tracing::trace!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Transport call settled"
            );
        }

        match outcome {
            TransportOutcome::Success(success) => {
                guard.status = success.status;
                guard.status_text = reason_phrase(success.status)
                    .unwrap_or_default()
                    .to_string();
                guard.response_headers = Some(success.headers);
                guard.response = Some(success.body);
                apply_state(&mut guard, ReadyState::Loaded)
            }
            TransportOutcome::Failure { message } => {
                // Failure leaves readyState alone; callers poll status == 0.
                guard.status = 0;
                guard.status_text = message;
                None
            }
        }
    };
    fire_change_hook(inner, hook);
}

/// Browser-style `XMLHttpRequest` object delegating I/O to a host transport.
///
/// One instance per logical request object, reusable across sequential
/// requests: each accepted `open()` aborts whatever was in flight and starts
/// a fresh lifecycle.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use xhr_shim::transport::TcpTransport;
/// use xhr_shim::XmlHttpRequest;
///
/// let xhr = XmlHttpRequest::new(Arc::new(TcpTransport::default()));
/// xhr.open("GET", "http://example.com/data", None, None, None);
/// xhr.set_request_header("X-Trace", "1")?;
/// xhr.send(None);
/// // ... poll xhr.ready_state() / xhr.status(), or register
/// // xhr.set_on_ready_state_change(...) before send.
/// ```
pub struct XmlHttpRequest {
    inner: Arc<Mutex<Inner>>,
    transport: Arc<dyn HostTransport>,
}

impl XmlHttpRequest {
    pub fn new(transport: Arc<dyn HostTransport>) -> Self {
        Self::with_config(transport, &Config::default())
    }

    /// Builds a request object whose default headers come from `config`.
    /// The defaults are merged into a fresh map per instance.
    pub fn with_config(transport: Arc<dyn HostTransport>, config: &Config) -> Self {
        let inner = Inner {
            method: Method::default(),
            url: String::new(),
            is_async: true,
            ready_state: ReadyState::Uninitialized,
            status: 0,
            status_text: String::new(),
            response_type: String::new(),
            request_headers: config.default_headers(),
            response_headers: None,
            response: None,
            response_xml: None,
            body: None,
            timeout_ms: 0.0,
            on_ready_state_change: None,
            start_time: None,
            task: None,
            seq: 0,
            active_seq: None,
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            transport,
        }
    }

    /// Configures the object for a new request.
    ///
    /// Always aborts any in-flight request first. An unknown method or an
    /// unparseable URL then leaves the object in its post-abort state: a
    /// silent no-op, no error raised. On success the method (normalized to
    /// uppercase), canonical URL (with embedded credentials, when supplied)
    /// and async flag (default true) are stored and the state moves to OPEN,
    /// firing the change notification.
    pub fn open(
        &self,
        method: &str,
        url: &str,
        is_async: Option<bool>,
        username: Option<&str>,
        password: Option<&str>,
    ) {
        self.abort();

        let Some(method) = Method::parse(method) else {
            return;
        };
        let Some(url) = canonicalize(url, username, password) else {
            return;
        };

        {
            let mut guard = lock_inner(&self.inner);
            guard.method = method;
            guard.url = url;
            guard.is_async = is_async.unwrap_or(true);
        }
        set_state(&self.inner, ReadyState::Open);
    }

    /// Sets or overwrites an outgoing header.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] unless the state is OPEN; request
    /// headers are immutable everywhere else.
    pub fn set_request_header(&self, name: &str, value: &str) -> Result<(), InvalidStateError> {
        let mut guard = lock_inner(&self.inner);
        if guard.ready_state != ReadyState::Open {
            return Err(InvalidStateError {
                state: guard.ready_state,
            });
        }
        guard
            .request_headers
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Starts the transport call. No-op unless the state is OPEN.
    ///
    /// Response fields are reset, the header map is snapshotted (later
    /// `setRequestHeader` calls do not affect the in-flight request), and
    /// the decode mode is derived from the configured `responseType`. Any
    /// still-live previous handle is cancelled first: at most one transport
    /// operation is outstanding per object.
    pub fn send(&self, body: Option<RequestBody>) {
        let (request, seq, previous) = {
            let mut guard = lock_inner(&self.inner);
            if guard.ready_state != ReadyState::Open {
                return;
            }
            guard.body = body;
            guard.status = 0;
            guard.status_text.clear();
            guard.ready_state = ReadyState::Open; // re-assert, not a transition
            guard.response_headers = None;
            guard.response = None;
            guard.start_time = Some(Instant::now());
            guard.seq += 1;
            let seq = guard.seq;
            guard.active_seq = Some(seq);

            let request = TransportRequest {
                url: guard.url.clone(),
                method: guard.method,
                headers: guard.request_headers.clone(),
                body: guard.body.clone(),
                decode: DecodeMode::from_response_type(&guard.response_type),
            };
            (request, seq, guard.task.take())
        };

        if let Some(previous) = previous {
            previous.cancel();
        }

        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            "Dispatching request"
        );

        let completion_state = Arc::clone(&self.inner);
        let mut handle = self.transport.start(
            request,
            Box::new(move |outcome| finish(&completion_state, seq, outcome)),
        );

        let headers_state = Arc::clone(&self.inner);
        handle.on_headers_received(move || headers_received(&headers_state, seq));

        let mut guard = lock_inner(&self.inner);
        if guard.active_seq == Some(seq) {
            guard.task = Some(handle);
        } else {
            // Aborted or already completed while starting up.
            drop(guard);
            handle.cancel();
        }
    }

    /// Cancels any in-flight transport call and hard-resets the object.
    ///
    /// The readyState reset is a direct field assignment: the original
    /// interface does not fire the change notification here.
    pub fn abort(&self) {
        let task = {
            let mut guard = lock_inner(&self.inner);
            guard.active_seq = None;
            guard.ready_state = ReadyState::Uninitialized;
            guard.status = 0;
            guard.status_text.clear();
            guard.response = Some(ResponseBody::Text(String::new()));
            guard.response_xml = Some(String::new());
            guard.start_time = None;
            guard.task.take()
        };
        if let Some(task) = task {
            tracing::debug!("Aborting in-flight request");
            task.cancel();
        }
    }

    pub fn ready_state(&self) -> ReadyState {
        lock_inner(&self.inner).ready_state
    }

    pub fn status(&self) -> u16 {
        lock_inner(&self.inner).status
    }

    /// Human-readable status. Empty while UNINITIALIZED/OPEN; afterwards the
    /// table phrase for the current code, falling back to the
    /// transport-supplied message, falling back to the empty string.
    pub fn status_text(&self) -> String {
        let guard = lock_inner(&self.inner);
        match guard.ready_state {
            ReadyState::Uninitialized | ReadyState::Open => String::new(),
            _ => match reason_phrase(guard.status) {
                Some(phrase) => phrase.to_string(),
                None if !guard.status_text.is_empty() => guard.status_text.clone(),
                None => String::new(),
            },
        }
    }

    pub fn method(&self) -> Method {
        lock_inner(&self.inner).method
    }

    pub fn url(&self) -> String {
        lock_inner(&self.inner).url.clone()
    }

    /// Informational only: no synchronous transport path exists, the object
    /// always behaves asynchronously.
    pub fn is_async(&self) -> bool {
        lock_inner(&self.inner).is_async
    }

    pub fn response_type(&self) -> String {
        lock_inner(&self.inner).response_type.clone()
    }

    /// Any string is accepted; only ""/"text"/"json"/"arraybuffer" change
    /// how the next `send()` asks the transport to decode the body.
    pub fn set_response_type(&self, value: &str) {
        lock_inner(&self.inner).response_type = value.to_string();
    }

    pub fn response(&self) -> Option<ResponseBody> {
        lock_inner(&self.inner).response.clone()
    }

    /// The response body as text. `None` unless `responseType` is empty or
    /// `"text"`, or while no response is recorded.
    pub fn response_text(&self) -> Option<String> {
        let guard = lock_inner(&self.inner);
        match guard.response_type.as_str() {
            "" | "text" => guard
                .response
                .as_ref()
                .and_then(|body| body.as_text())
                .map(str::to_string),
            _ => None,
        }
    }

    /// XML parsing is out of scope; this is always `None` (empty after an
    /// abort, mirroring the original reset).
    pub fn response_xml(&self) -> Option<String> {
        lock_inner(&self.inner).response_xml.clone()
    }

    pub fn timeout(&self) -> f64 {
        lock_inner(&self.inner).timeout_ms
    }

    /// Accepts only finite positive millisecond values; anything else is
    /// silently ignored and the previous value kept. Stored but not wired
    /// to cancellation.
    pub fn set_timeout(&self, ms: f64) {
        if !ms.is_finite() || ms <= 0.0 {
            return;
        }
        lock_inner(&self.inner).timeout_ms = ms;
    }

    /// Registers the change notification, replacing any previous one. It is
    /// invoked on every genuine readyState transition, with internal locks
    /// released, so it may call back into this object.
    pub fn set_on_ready_state_change(&self, hook: impl FnMut() + Send + 'static) {
        lock_inner(&self.inner).on_ready_state_change = Some(Box::new(hook));
    }

    /// All recorded response headers as `Name: value` lines joined by CRLF,
    /// in map iteration order. `None` while UNINITIALIZED/OPEN or when no
    /// headers are recorded.
    pub fn get_all_response_headers(&self) -> Option<String> {
        let guard = lock_inner(&self.inner);
        if matches!(
            guard.ready_state,
            ReadyState::Uninitialized | ReadyState::Open
        ) {
            return None;
        }
        let headers = guard.response_headers.as_ref()?;
        let lines: Vec<String> = headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        Some(lines.join("\r\n"))
    }

    /// A single recorded response header, under the same guard as
    /// [`get_all_response_headers`](Self::get_all_response_headers).
    pub fn get_response_header(&self, name: &str) -> Option<String> {
        let guard = lock_inner(&self.inner);
        if matches!(
            guard.ready_state,
            ReadyState::Uninitialized | ReadyState::Open
        ) {
            return None;
        }
        guard.response_headers.as_ref()?.get(name).cloned()
    }

    /// The stored outgoing header value, or the empty string when absent.
    /// Unlike the response-header accessors this has no state guard.
    pub fn get_request_header(&self, name: &str) -> String {
        lock_inner(&self.inner)
            .request_headers
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}
