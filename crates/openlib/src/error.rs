pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when calling the openlib functions.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    status: Option<u16>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be sent or the response could not be read.
    Io,
    /// The server answered with a non-success status code.
    Status,
    /// The response body could not be decoded into the expected type.
    Deserialize,
    /// An ISBN was rejected before any request was made.
    InvalidIsbn,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            status: None,
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    ///
    /// A wrapped error is transparent: the [`Error`] displays as the wrapped error and reports
    /// the wrapped error's own source.
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            status: None,
            source: Some(source.into()),
        }
    }

    /// Creates a new [`Error`] with a message and an underlying cause.
    pub fn with_source<S, E>(kind: ErrorKind, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<DynError>,
    {
        Self {
            kind,
            message: Some(message.into()),
            status: None,
            source: Some(source.into()),
        }
    }

    /// Creates an [`ErrorKind::Status`] error for a response with the given status code.
    pub fn status_code<S: Into<String>>(status: u16, message: S) -> Self {
        Self {
            kind: ErrorKind::Status,
            message: Some(message.into()),
            status: Some(status),
            source: None,
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status code for [`ErrorKind::Status`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns a reference to the underlying error, if any.
    #[must_use]
    pub fn get_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.message, &self.source) {
            (Some(message), _) => f.write_str(message),
            (None, Some(source)) => std::fmt::Display::fmt(source, f),
            (None, None) => match self.kind {
                ErrorKind::Io => f.write_str("IO error"),
                ErrorKind::Status => f.write_str("Status error"),
                ErrorKind::Deserialize => f.write_str("Deserialize error"),
                ErrorKind::InvalidIsbn => f.write_str("Invalid ISBN"),
            },
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source = self.source.as_deref()?;
        if self.message.is_some() {
            Some(source as _)
        } else {
            // wrapped errors are transparent so skip straight to their cause
            source.source()
        }
    }
}
