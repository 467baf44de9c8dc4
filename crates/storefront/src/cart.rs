//! Client-side cart state, synchronized against the backend cart resource.
//!
//! The backend owns the cart; [`CartStore`] holds the authoritative local
//! view of it. Every mutation goes to the backend first and is followed by a
//! reload, so local lines are only ever whole snapshots the backend served.
//! Remote failures keep the previous (stale but displayed) state and are
//! logged rather than surfaced - the customer retries by acting again.

use greenbasket_core::{Email, Money, ProductId};
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::checkout::{self, CheckoutError};
use crate::session::Session;
use crate::types::{Cart, CartLine};

/// Identifies one issued load so completions can be ordered.
///
/// Refresh triggers (regaining focus, pull-to-refresh) can overlap, and
/// responses arrive in any order. A completing load is applied only if its
/// token is the newest issued, so a stale response never overwrites a
/// fresher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// The authoritative client-side view of a customer's cart.
pub struct CartStore {
    api: ApiClient,
    owner: Email,
    lines: Vec<CartLine>,
    /// Sequence number of the most recently issued load.
    issued: u64,
}

impl CartStore {
    /// Create a store for the signed-in customer. The cart starts empty
    /// until the first [`load`](Self::load).
    #[must_use]
    pub fn new(api: ApiClient, session: &Session) -> Self {
        Self {
            api,
            owner: session.user().clone(),
            lines: Vec::new(),
            issued: 0,
        }
    }

    /// The customer this cart belongs to.
    #[must_use]
    pub const fn owner(&self) -> &Email {
        &self.owner
    }

    /// Current cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Derived total: sum of quantity times unit price over all lines.
    /// Recomputed on every call, never cached.
    #[must_use]
    pub fn total(&self) -> Money {
        self.snapshot().total()
    }

    /// A snapshot of the current cart, detached from the store.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        Cart {
            owner: self.owner.clone(),
            lines: self.lines.clone(),
        }
    }

    /// Gate for entering checkout from the cart view.
    ///
    /// On success returns the snapshot checkout starts from; the cart view
    /// hands it to [`crate::checkout::CheckoutOrchestrator::begin`].
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::BelowMinimum`] when the cart total does not
    /// exceed the minimum order threshold; checkout entry must be refused
    /// with a user-facing message.
    pub fn checkout_gate(&self) -> Result<Cart, CheckoutError> {
        let cart = self.snapshot();
        checkout::check_minimum(cart.total())?;
        Ok(cart)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Issue a load token. The newest token wins; issuing a new one makes
    /// every outstanding load stale.
    pub const fn begin_load(&mut self) -> LoadToken {
        self.issued += 1;
        LoadToken(self.issued)
    }

    /// Apply a completed load.
    ///
    /// The result replaces local state wholesale, but only when `token` is
    /// the newest issued; completions of superseded loads are dropped. A
    /// failed load keeps the previous state and is logged.
    pub fn complete_load(&mut self, token: LoadToken, result: Result<Cart, ApiError>) {
        if token.0 != self.issued {
            tracing::debug!(
                token = token.0,
                newest = self.issued,
                "dropping stale cart load"
            );
            return;
        }
        match result {
            Ok(cart) => self.lines = cart.lines,
            Err(e) => {
                tracing::error!(owner = %self.owner, error = %e, "failed to load cart");
            }
        }
    }

    /// Fetch the remote cart and replace local state wholesale.
    ///
    /// Refresh triggers are the caller's concern (re-entering the cart view,
    /// an explicit refresh gesture); no background refresh happens here. On
    /// failure the prior state is retained and no retry is attempted.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn load(&mut self) {
        let token = self.begin_load();
        let result = self.api.fetch_cart(&self.owner).await;
        self.complete_load(token, result);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Set the quantity of a product in the cart.
    ///
    /// A quantity of 0 or less removes the product entirely; the cart never
    /// holds a zero-quantity line. The backend is updated first and the cart
    /// reloaded after; if the remote call fails, local state is left
    /// unchanged and the error is logged.
    #[instrument(skip(self), fields(owner = %self.owner, product_id = %product_id))]
    pub async fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        let result = match u32::try_from(quantity) {
            Ok(quantity @ 1..) => {
                self.api
                    .update_cart_line(&self.owner, product_id, quantity)
                    .await
            }
            // 0 or negative: the product comes out of the cart
            _ => self.api.remove_cart_line(&self.owner, product_id).await,
        };

        match result {
            Ok(()) => self.load().await,
            Err(e) => {
                tracing::error!(error = %e, "failed to update cart");
            }
        }
    }

    /// Add a product to the cart, then reload.
    ///
    /// Remote failure leaves local state unchanged and is logged.
    #[instrument(skip(self), fields(owner = %self.owner, product_id = %product_id))]
    pub async fn add(&mut self, product_id: &ProductId, quantity: u32) {
        match self
            .api
            .add_cart_line(&self.owner, product_id, quantity)
            .await
        {
            Ok(()) => self.load().await,
            Err(e) => {
                tracing::error!(error = %e, "failed to add to cart");
            }
        }
    }
}
