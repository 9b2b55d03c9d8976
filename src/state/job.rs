/// Fetch job definitions for tracking favicon requests
///
/// A job is created once per domain that needs an icon. Each attempt the
/// job makes is described by an immutable [`Attempt`]; a resubmission builds
/// a new job value carrying the next attempt instead of mutating the old one.
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// URL scheme an attempt is made with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }

    /// Returns true for the TLS scheme, the only one that can be downgraded
    pub fn is_secure(&self) -> bool {
        matches!(self, Self::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known icon path requested by an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathVariant {
    /// `/favicon.ico`
    Primary,
    /// `/favicon.png`, tried once after the primary path returns 404
    Alternate,
}

impl PathVariant {
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::Primary => "/favicon.ico",
            Self::Alternate => "/favicon.png",
        }
    }
}

/// Whether the alternate-path retry has been spent for a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RetryState {
    #[default]
    Initial,
    PathRetried,
}

/// One request attempt for a job
///
/// Attempts are never changed once dispatched; retries derive a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub scheme: Scheme,
    pub path: PathVariant,
    /// 1-based attempt counter
    pub number: u32,
}

impl Attempt {
    /// The first attempt every job starts with: `https://<host>/favicon.ico`
    pub fn initial() -> Self {
        Self {
            scheme: Scheme::Https,
            path: PathVariant::Primary,
            number: 1,
        }
    }

    /// Next attempt asking for the alternate icon path on the same scheme
    pub fn with_alternate_path(&self) -> Self {
        Self {
            scheme: self.scheme,
            path: PathVariant::Alternate,
            number: self.number + 1,
        }
    }

    /// Next attempt on plain HTTP, keeping the current path
    pub fn downgraded(&self) -> Self {
        Self {
            scheme: Scheme::Http,
            path: self.path,
            number: self.number + 1,
        }
    }
}

/// A favicon fetch for one sanitized domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    /// Canonical domain, used as storage key
    pub sanitized_domain: String,

    /// Host as linked in the source URL, used for the request itself
    pub raw_domain: String,

    /// File the icon is written to on success
    pub destination: PathBuf,

    /// Attempt to dispatch next
    pub attempt: Attempt,

    pub retry_state: RetryState,
}

impl FetchJob {
    /// Creates a job in its initial state
    pub fn new(
        sanitized_domain: impl Into<String>,
        raw_domain: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sanitized_domain: sanitized_domain.into(),
            raw_domain: raw_domain.into(),
            destination: destination.into(),
            attempt: Attempt::initial(),
            retry_state: RetryState::Initial,
        }
    }

    /// Builds the request URL for the current attempt
    ///
    /// # Errors
    ///
    /// Returns a parse error if the raw domain does not form a valid host.
    pub fn request_url(&self) -> Result<Url, ::url::ParseError> {
        Url::parse(&format!(
            "{}://{}{}",
            self.attempt.scheme,
            self.raw_domain,
            self.attempt.path.as_path()
        ))
    }

    /// Value of the `Origin` header sent with every attempt of this job
    pub fn origin(&self) -> String {
        format!("https://{}", self.raw_domain)
    }

    /// Returns true if the job carries a usable destination path
    pub fn has_destination(&self) -> bool {
        !self.destination.as_os_str().is_empty()
    }
}
