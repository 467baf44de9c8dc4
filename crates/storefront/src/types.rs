//! Domain types for the cart/checkout core.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! shapes decoded at the REST boundary (see [`crate::api::wire`]).

use chrono::NaiveDate;
use greenbasket_core::{AddressId, Email, Money, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Types
// =============================================================================

/// A single product line in the cart.
///
/// Lines with quantity 0 never exist: dropping a quantity to 0 removes the
/// line from the cart entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Display name captured when the line was fetched.
    pub name: String,
    /// Unit price snapshot from the backend catalog.
    pub unit_price: Money,
    /// Number of units; always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line: quantity times the unit price snapshot.
    #[must_use]
    pub fn line_total(&self) -> Money {
        Money::new(
            self.unit_price.amount * Decimal::from(self.quantity),
            self.unit_price.currency_code,
        )
    }
}

/// The customer's cart, mirrored from the backend.
///
/// The total is never stored: it is recomputed from the lines on every call,
/// so it can never go stale relative to a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Customer the cart belongs to.
    pub owner: Email,
    /// Product lines; order carries no meaning.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart for the given customer.
    #[must_use]
    pub const fn empty(owner: Email) -> Self {
        Self {
            owner,
            lines: Vec::new(),
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantity times unit price over all lines.
    #[must_use]
    pub fn total(&self) -> Money {
        Money::inr(
            self.lines
                .iter()
                .map(|line| line.unit_price.amount * Decimal::from(line.quantity))
                .sum(),
        )
    }
}

// =============================================================================
// Address Types
// =============================================================================

/// A saved delivery address.
///
/// Addresses are create-and-list only; the client never updates or deletes
/// them. `id` is absent on addresses appended optimistically after a create,
/// before the list has been refreshed from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Backend identifier, when known.
    pub id: Option<AddressId>,
    /// Customer the address belongs to.
    pub owner: Email,
    /// House or flat number.
    pub house_no: String,
    /// Street name.
    pub street_name: String,
    /// City.
    pub city: String,
    /// District.
    pub district: String,
    /// Optional landmark to help the rider.
    pub landmark: Option<String>,
    /// Postal code.
    pub pincode: String,
    /// Contact number for the delivery.
    pub mobile_number: String,
}

/// Unvalidated address form input.
///
/// Validated by [`crate::addresses::AddressBook::create`]; every field except
/// `landmark` must be non-empty before any network call is made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDraft {
    pub house_no: String,
    pub street_name: String,
    pub city: String,
    pub district: String,
    pub landmark: Option<String>,
    pub pincode: String,
    pub mobile_number: String,
}

// =============================================================================
// Checkout Types
// =============================================================================

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// UPI payment launched through a platform deep link.
    Upi,
    /// Cash handed over on delivery or pickup.
    CashOnDelivery,
}

impl PaymentMethod {
    /// Wire value understood by the checkout endpoint.
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::CashOnDelivery => "Cash",
        }
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Customer picks the order up themselves.
    Takeaway,
    /// Order is delivered to a saved address.
    HomeDelivery,
}

impl OrderType {
    /// Wire value understood by the checkout endpoint.
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::Takeaway => "Takeaway",
            Self::HomeDelivery => "Home Delivery",
        }
    }
}

/// An order produced by a successful checkout submission.
///
/// The lines are a snapshot taken when checkout began, not a live reference
/// to the cart. Immutable from this crate's perspective once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Customer who placed the order.
    pub owner: Email,
    /// Snapshot of the cart lines at submission.
    pub lines: Vec<CartLine>,
    /// Total charged, derived from the snapshot.
    pub total: Money,
    /// Selected payment method.
    pub payment_method: PaymentMethod,
    /// Selected order type.
    pub order_type: OrderType,
    /// Delivery address; present exactly when `order_type` is home delivery.
    pub address: Option<Address>,
    /// Expected delivery date; present for home delivery orders.
    pub expected_delivery: Option<NaiveDate>,
}
