/// HTTP request methods.
///
/// The closed allow-list of verbs a request object accepts. `open()` rejects
/// anything outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// OPTIONS - Describe communication options
    Options,
    /// GET - Retrieve a resource
    Get,
    /// HEAD - Like GET but without the response body
    Head,
    /// POST - Create or submit data
    Post,
    /// PUT - Replace a resource
    Put,
    /// DELETE - Delete a resource
    Delete,
    /// TRACE - Message loop-back test
    Trace,
    /// CONNECT - Establish a tunnel
    Connect,
}

impl Method {
    /// Parses an HTTP method from a string, case-insensitively.
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the uppercased string matches an allowed verb,
    /// `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use xhr_shim::http::method::Method;
    /// assert_eq!(Method::parse("GET"), Some(Method::Get));
    /// assert_eq!(Method::parse("post"), Some(Method::Post));
    /// assert_eq!(Method::parse("BREW"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OPTIONS" => Some(Method::Options),
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "TRACE" => Some(Method::Trace),
            "CONNECT" => Some(Method::Connect),
            _ => None,
        }
    }

    /// Returns the normalized uppercase form used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Options => "OPTIONS",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Get
    }
}
