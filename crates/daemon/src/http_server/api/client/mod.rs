//! Typed client for the daemon API.
//!
//! Each endpoint module defines a request type implementing [`ApiRequest`];
//! the [`ApiClient`] turns one into an HTTP call and decodes the response.

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

/// One API operation: how to build its HTTP request and what it returns.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder;
}
