//! GreenBasket backend REST client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for carts, addresses, and orders -
//!   no local persistence, direct API calls
//! - Every response is decoded through the typed shapes in [`wire`] and
//!   validated by [`conversions`] before reaching domain state
//! - Cart and order endpoints are never cached (mutable state)

pub mod conversions;
pub mod wire;

use std::sync::Arc;

use greenbasket_core::{Email, ProductId};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::checkout::SubmitOrder;
use crate::config::StorefrontConfig;
use crate::types::{Address, Cart, Order};

pub use conversions::ConversionError;

/// Errors that can occur when talking to the GreenBasket backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connectivity, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response decoded but violated a domain invariant.
    #[error("invalid payload: {0}")]
    Payload(#[from] ConversionError),

    /// The checkout endpoint reported the order was not accepted.
    #[error("order was not accepted by the backend")]
    Rejected,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the GreenBasket backend REST API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base: config.api_base.clone(),
            }),
        }
    }

    /// Build an endpoint URL by appending path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base.clone();
        // Config guarantees an absolute http(s) base, so segments are always
        // appendable; reserved characters get percent-encoded by the Url crate.
        if let Ok(mut parts) = url.path_segments_mut() {
            parts.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a GET request and decode the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.inner.client.get(url).send().await?;
        let text = read_success(response).await?;
        decode(&text)
    }

    // =========================================================================
    // Cart Endpoints
    // =========================================================================

    /// Fetch the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend reports a
    /// non-success status, or the payload is malformed.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn fetch_cart(&self, owner: &Email) -> Result<Cart, ApiError> {
        let url = self.endpoint(&["cart", owner.as_str()]);
        let entries: Vec<wire::CartEntryWire> = self.get_json(url).await?;
        Ok(conversions::convert_cart(owner.clone(), entries)?)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports a
    /// non-success status.
    #[instrument(skip(self), fields(owner = %owner, product_id = %product_id))]
    pub async fn update_cart_line(
        &self,
        owner: &Email,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["cart", owner.as_str()]);
        let body = wire::CartUpdateRequest {
            product_id: product_id.as_str().to_owned(),
            quantity,
        };
        let response = self.inner.client.put(url).json(&body).send().await?;
        read_success(response).await?;
        Ok(())
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports a
    /// non-success status.
    #[instrument(skip(self), fields(owner = %owner, product_id = %product_id))]
    pub async fn remove_cart_line(
        &self,
        owner: &Email,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["cart", owner.as_str(), product_id.as_str()]);
        let response = self.inner.client.delete(url).send().await?;
        read_success(response).await?;
        Ok(())
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports a
    /// non-success status.
    #[instrument(skip(self), fields(owner = %owner, product_id = %product_id))]
    pub async fn add_cart_line(
        &self,
        owner: &Email,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["cart", "add"]);
        let body = wire::CartAddRequest {
            product_id: product_id.as_str().to_owned(),
            email: owner.as_str().to_owned(),
            quantity,
        };
        let response = self.inner.client.post(url).json(&body).send().await?;
        read_success(response).await?;
        Ok(())
    }

    // =========================================================================
    // Address Endpoints
    // =========================================================================

    /// List the customer's saved addresses. No addresses is an empty list,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend reports a
    /// non-success status, or the payload is malformed.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn list_addresses(&self, owner: &Email) -> Result<Vec<Address>, ApiError> {
        let url = self.endpoint(&["api", "users", owner.as_str(), "addresses"]);
        let documents: Vec<wire::AddressWire> = self.get_json(url).await?;
        Ok(documents
            .into_iter()
            .map(|doc| conversions::convert_address(owner, doc))
            .collect())
    }

    /// Persist a new address. The backend signals success with 201 Created.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend responds with
    /// anything other than 201.
    #[instrument(skip(self, address), fields(owner = %address.owner))]
    pub async fn create_address(&self, address: &Address) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "addresses"]);
        let body = conversions::address_to_wire(address);
        let response = self.inner.client.post(url).json(&body).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let text = response.text().await?;
            tracing::error!(
                status = %status,
                body = %snippet(&text),
                "address was not created"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: snippet(&text),
            });
        }
        Ok(())
    }
}

impl SubmitOrder for ApiClient {
    /// Post a finalized order to the checkout endpoint.
    ///
    /// The backend answers `{"success": bool}`; `false` maps to
    /// [`ApiError::Rejected`] so callers see one failure path.
    #[instrument(skip(self, order), fields(owner = %order.owner))]
    async fn submit_order(&self, order: &Order) -> Result<(), ApiError> {
        let url = self.endpoint(&["checkout"]);
        let body = conversions::checkout_request(order)?;
        let response = self.inner.client.post(url).json(&body).send().await?;
        let text = read_success(response).await?;
        let confirmation: wire::CheckoutResponse = decode(&text)?;
        if confirmation.success {
            Ok(())
        } else {
            Err(ApiError::Rejected)
        }
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Check the status and return the body text for decoding.
async fn read_success(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    // Read the body as text first for better error diagnostics
    let text = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %snippet(&text),
            "backend returned non-success status"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: snippet(&text),
        });
    }
    Ok(text)
}

/// Decode a JSON body, logging the offending payload on failure.
fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %snippet(text),
            "failed to decode backend response"
        );
        ApiError::Decode(e)
    })
}

fn snippet(text: &str) -> String {
    text.chars().take(500).collect()
}
