//! Unified error handling with Sentry integration.
//!
//! Most of the engine never fails outward: catalog failures surface as a
//! visible message in the frame. [`Error`] covers the edges where a caller
//! does need a `Result`, such as startup or pledge submission.

use greenroot_core::PledgeError;
use thiserror::Error;

use crate::catalog::FetchError;
use crate::config::ConfigError;

/// Storefront error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Fetch(#[from] FetchError),

    /// Pledge form input was rejected.
    #[error("Invalid pledge: {0}")]
    Pledge(#[from] PledgeError),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame or record could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No displayed product has the given id.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

impl Error {
    /// Report the error to Sentry and the log.
    ///
    /// Only failures outside the user's control are captured; invalid input
    /// is logged at warn level.
    pub fn report(&self) {
        if matches!(self, Self::Fetch(_) | Self::Io(_) | Self::Json(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront error");
        }
    }
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("intent", "Selected category", Some(&[("category_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownProduct("t9".to_string());
        assert_eq!(err.to_string(), "Unknown product: t9");

        let err = Error::from(FetchError::Status {
            status: 503,
            endpoint: "https://api.example.com/plants".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Catalog error: https://api.example.com/plants returned HTTP 503"
        );
    }

    #[test]
    fn test_error_from_pledge() {
        let err = Error::from(PledgeError::TooFewTrees);
        assert!(matches!(err, Error::Pledge(PledgeError::TooFewTrees)));
        assert!(err.to_string().starts_with("Invalid pledge: "));
    }

    #[test]
    fn test_error_from_config() {
        let err = Error::from(ConfigError::InvalidEnvVar(
            "CATALOG_TIMEOUT_SECS".to_string(),
            "soon".to_string(),
        ));
        assert!(matches!(err, Error::Config(ConfigError::InvalidEnvVar(..))));
        assert!(err.to_string().starts_with("Configuration error: "));
        err.report();
    }

    #[test]
    fn test_report_without_sentry_client_is_harmless() {
        Error::UnknownProduct("x".to_string()).report();
        Error::from(FetchError::Status {
            status: 500,
            endpoint: "plants".to_string(),
        })
        .report();
        add_breadcrumb("intent", "Opened detail", Some(&[("product_id", "x")]));
    }
}
