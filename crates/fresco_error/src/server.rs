//! Server error types.

/// Kinds of server failure.
#[derive(Debug, Clone, derive_more::Display)]
pub enum ServerErrorKind {
    /// Invalid or missing configuration
    #[display("configuration: {}", _0)]
    Configuration(String),
    /// Failed to bind the listen address
    #[display("bind: {}", _0)]
    Bind(String),
    /// The HTTP server stopped with an error
    #[display("serve: {}", _0)]
    Serve(String),
    /// A session violated a pipeline invariant
    #[display("session: {}", _0)]
    Session(String),
}

/// Server error with source location.
#[derive(Debug, Clone)]
pub struct ServerError {
    /// What failed
    pub kind: ServerErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ServerError {
    /// Create a new ServerError with the given kind at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fresco_error::{ServerError, ServerErrorKind};
    ///
    /// let err = ServerError::new(ServerErrorKind::Bind("address in use".into()));
    /// assert!(matches!(err.kind, ServerErrorKind::Bind(_)));
    /// ```
    #[track_caller]
    pub fn new(kind: ServerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Server Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ServerError {}
