//! Cross-origin resource sharing for browser clients.
//!
//! [`CorsPolicy`] is the cloneable configuration; [`CorsPolicy::layer`] builds
//! the `actix-cors` middleware once per worker. Without an explicit origin
//! allow-list every origin is accepted.

use actix_cors::Cors;
use actix_web::http::{Uri, header};

use crate::domain::TRACE_ID_HEADER;

/// How long browsers may cache a preflight answer.
pub const PREFLIGHT_MAX_AGE_SECS: usize = 3_600;

/// Errors raised while building a [`CorsPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorsPolicyError {
    #[error("invalid CORS origin `{origin}`: expected scheme://host[:port]")]
    InvalidOrigin { origin: String },
}

/// Origins allowed to call the API from a browser.
///
/// # Examples
/// ```
/// use logistics_api::middleware::CorsPolicy;
///
/// let policy = CorsPolicy::from_origins(["https://ops.example.com/"]).expect("valid origin");
/// assert_eq!(
///     policy.allowed_origins(),
///     Some(&["https://ops.example.com".to_owned()][..])
/// );
/// assert_eq!(CorsPolicy::from_origins(["*"]), Ok(CorsPolicy::any_origin()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsPolicy {
    origins: Option<Vec<String>>,
}

impl CorsPolicy {
    /// Accept requests from every origin.
    #[must_use]
    pub fn any_origin() -> Self {
        Self::default()
    }

    /// Restrict browsers to `origins`.
    ///
    /// Blank entries are skipped; a `*` entry, or no entries at all, yields
    /// [`CorsPolicy::any_origin`]. A trailing slash is dropped so values
    /// compare equal to the `Origin` header browsers send.
    pub fn from_origins<I, S>(origins: I) -> Result<Self, CorsPolicyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = Vec::new();
        for origin in origins {
            let origin = origin.as_ref().trim();
            if origin.is_empty() {
                continue;
            }
            if origin == "*" {
                return Ok(Self::any_origin());
            }
            allowed.push(normalise_origin(origin)?);
        }
        if allowed.is_empty() {
            return Ok(Self::any_origin());
        }
        Ok(Self {
            origins: Some(allowed),
        })
    }

    /// Explicit allow-list, or `None` when every origin is accepted.
    pub fn allowed_origins(&self) -> Option<&[String]> {
        self.origins.as_deref()
    }

    /// Build the middleware for one worker.
    #[must_use]
    pub fn layer(&self) -> Cors {
        let cors = Cors::default()
            .allowed_methods(["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers([TRACE_ID_HEADER])
            .max_age(PREFLIGHT_MAX_AGE_SECS);
        match &self.origins {
            None => cors.allow_any_origin(),
            Some(origins) => origins
                .iter()
                .fold(cors, |cors, origin| cors.allowed_origin(origin)),
        }
    }
}

fn normalise_origin(origin: &str) -> Result<String, CorsPolicyError> {
    let invalid = || CorsPolicyError::InvalidOrigin {
        origin: origin.to_owned(),
    };
    let uri: Uri = origin.parse().map_err(|_| invalid())?;
    let is_origin = matches!(uri.scheme_str(), Some("http" | "https"))
        && uri.host().is_some_and(|host| !host.is_empty())
        && matches!(uri.path(), "" | "/")
        && uri.query().is_none();
    if !is_origin {
        return Err(invalid());
    }
    Ok(origin.trim_end_matches('/').to_owned())
}
