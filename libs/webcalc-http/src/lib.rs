#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Small HTTP client for talking to one JSON endpoint.
//!
//! Built from hyper, rustls and tower: a bounded request buffer, one deadline
//! covering the response head and body, a default User-Agent, and body reads
//! capped at a configured size. HTTPS is verified against the webpki roots and
//! required unless the client opts into plain HTTP.
//!
//! There is no retry or redirect handling. Each request resolves once, with a
//! response of any status or with an [`HttpError`].
//!
//! ```ignore
//! let client = webcalc_http::HttpClientBuilder::new()
//!     .timeout(Duration::from_secs(10))
//!     .transport(TransportSecurity::AllowInsecureHttp)
//!     .build()?;
//! let resp = client.post("http://127.0.0.1:8083/api/calc").json(&body)?.send().await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use request::{RequestBuilder, check_target};
pub use response::{HttpResponse, ResponseBody};

pub use http::StatusCode;
