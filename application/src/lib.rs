//! Application provides HTTP API and Telegram bot for relaying game scores
//! through the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
pub mod error;

use axum::{routing::post, Extension, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
// Used in binary.
use axum_client_ip as _;
use futures as _;
use tokio as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<
    service::infra::InMemory,
    service::infra::telegram::Client,
>;

/// Builds a [`CorsLayer`] allowing the provided origins.
///
/// `*` among the `origins` allows any origin.
///
/// # Errors
///
/// If any of the `origins` is not a valid header value.
pub fn cors(
    origins: &[String],
) -> Result<CorsLayer, http::header::InvalidHeaderValue> {
    let origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .map(|o| o.parse::<http::HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?,
        )
    };

    Ok(CorsLayer::new()
        .allow_methods([http::Method::OPTIONS, http::Method::POST])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(origin))
}

/// Builds the HTTP API [`Router`] of the provided [`Service`].
pub fn router(service: Service, cors: CorsLayer) -> Router {
    Router::new()
        .route("/score", post(api::score::submit))
        .layer(Extension(service))
        .layer(cors)
}
