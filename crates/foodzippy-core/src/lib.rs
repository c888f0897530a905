//! Core types, configuration and business rules for the Foodzippy admin console

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod content;
pub mod error;
pub mod form;
pub mod notification;
pub mod payment;
pub mod staff;
pub mod types;
pub mod utils;
pub mod vendor;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use form::{FieldDraft, FieldType, FormField, FormLayout, FormSection, VendorType};
pub use notification::{BadgeCounts, NavigationTarget, Notification, NotificationPage};
pub use payment::{
    PaymentCategory, PaymentConfig, PaymentEstimate, PaymentType, VisitStage, VisitStatus,
};
pub use staff::{AttendanceRecord, StaffUser};
pub use types::{AdminIdentity, EntityId, Pagination, Role};
pub use vendor::{Vendor, VendorStatus};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level`. Output goes to stderr so that
/// JSON printed on stdout stays machine readable.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| Error::Other(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_logging_init_is_an_error() {
        // The first call may race with other tests; only the second must fail.
        let _ = init_logging("debug", false);
        assert!(init_logging("info", true).is_err());
    }
}
