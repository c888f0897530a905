//! Typed async client for the Foodzippy admin backend
//!
//! [`ApiClient`] binds every admin endpoint. [`AuthContext`] owns the signed
//! in session and its persistence. The workflow modules ([`form_builder`],
//! [`inbox`], [`payment_ledger`], [`partner_approval`], [`vendor_review`]
//! and [`poller`]) combine several calls into the operations the console
//! offers.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::future_not_send
)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod form_builder;
pub mod inbox;
pub mod partner_approval;
pub mod payment_ledger;
pub mod poller;
pub mod retry;
pub mod session;
pub mod vendor_review;

pub use api::attendance::AttendanceSource;
pub use auth::{AuthContext, RestoreOutcome};
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use form_builder::FormBuilder;
pub use inbox::Inbox;
pub use payment_ledger::PaymentLedger;
pub use poller::BadgePoller;
pub use retry::with_network_retry;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
