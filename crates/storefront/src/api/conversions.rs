//! Conversions between wire shapes and domain types.
//!
//! Decoding is strict: payloads that parse as JSON but violate domain
//! invariants (non-positive quantities, non-finite prices) are rejected here
//! with a [`ConversionError`] rather than propagated into state.

use greenbasket_core::{AddressId, Email, Money, ProductId};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use crate::types::{Address, Cart, CartLine, Order};

use super::wire::{AddressWire, CartEntryWire, CheckoutRequest, ProductWire};

/// A payload decoded as JSON but failed domain validation.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A cart entry carried a quantity below 1.
    #[error("cart entry for product {product_id} has non-positive quantity {quantity}")]
    NonPositiveQuantity { product_id: String, quantity: i64 },

    /// A price could not be represented as a decimal amount.
    #[error("product {product_id} has unrepresentable price {price}")]
    UnrepresentablePrice { product_id: String, price: f64 },

    /// An amount could not be represented on the wire.
    #[error("amount {0} cannot be represented as a wire number")]
    UnrepresentableAmount(Decimal),
}

/// Convert a fetched cart payload into a domain [`Cart`].
///
/// # Errors
///
/// Returns a [`ConversionError`] if any entry has a quantity below 1 or a
/// price that is not a finite number.
pub fn convert_cart(owner: Email, entries: Vec<CartEntryWire>) -> Result<Cart, ConversionError> {
    let lines = entries
        .into_iter()
        .map(convert_cart_entry)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Cart { owner, lines })
}

fn convert_cart_entry(entry: CartEntryWire) -> Result<CartLine, ConversionError> {
    let quantity =
        u32::try_from(entry.quantity).map_err(|_| ConversionError::NonPositiveQuantity {
            product_id: entry.product.id.clone(),
            quantity: entry.quantity,
        })?;
    if quantity == 0 {
        return Err(ConversionError::NonPositiveQuantity {
            product_id: entry.product.id,
            quantity: 0,
        });
    }

    let amount =
        Decimal::try_from(entry.product.price).map_err(|_| ConversionError::UnrepresentablePrice {
            product_id: entry.product.id.clone(),
            price: entry.product.price,
        })?;

    Ok(CartLine {
        product_id: ProductId::new(entry.product.id),
        name: entry.product.name,
        unit_price: Money::inr(amount),
        quantity,
    })
}

/// Convert a listed address document into a domain [`Address`].
///
/// The backend echoes the owning email on each document; if it is missing or
/// malformed the requesting customer is used, since the endpoint is keyed by
/// their email anyway.
#[must_use]
pub fn convert_address(requester: &Email, wire: AddressWire) -> Address {
    let owner = wire
        .user_email
        .as_deref()
        .and_then(|raw| Email::parse(raw).ok())
        .unwrap_or_else(|| requester.clone());

    Address {
        id: wire.id.map(AddressId::new),
        owner,
        house_no: wire.house_no,
        street_name: wire.street_name,
        city: wire.city,
        district: wire.district,
        landmark: wire.landmark,
        pincode: wire.pincode,
        mobile_number: wire.mobile_number,
    }
}

/// Convert a domain [`Address`] into its wire document.
#[must_use]
pub fn address_to_wire(address: &Address) -> AddressWire {
    AddressWire {
        id: address.id.as_ref().map(|id| id.as_str().to_owned()),
        user_email: Some(address.owner.as_str().to_owned()),
        house_no: address.house_no.clone(),
        street_name: address.street_name.clone(),
        city: address.city.clone(),
        district: address.district.clone(),
        landmark: address.landmark.clone(),
        pincode: address.pincode.clone(),
        mobile_number: address.mobile_number.clone(),
    }
}

/// Build the `POST /checkout` body for a finalized [`Order`].
///
/// # Errors
///
/// Returns a [`ConversionError`] if an amount cannot be represented as a
/// wire number.
pub fn checkout_request(order: &Order) -> Result<CheckoutRequest, ConversionError> {
    let products = order
        .lines
        .iter()
        .map(line_to_wire)
        .collect::<Result<Vec<_>, _>>()?;

    let total_amount = order
        .total
        .amount
        .to_f64()
        .ok_or(ConversionError::UnrepresentableAmount(order.total.amount))?;

    Ok(CheckoutRequest {
        user_email: order.owner.as_str().to_owned(),
        products,
        total_amount,
        payment_method: order.payment_method.wire_value(),
        order_type: order.order_type.wire_value(),
        address: order.address.as_ref().map(address_to_wire),
    })
}

fn line_to_wire(line: &CartLine) -> Result<CartEntryWire, ConversionError> {
    let price = line
        .unit_price
        .amount
        .to_f64()
        .ok_or(ConversionError::UnrepresentableAmount(line.unit_price.amount))?;

    Ok(CartEntryWire {
        product: ProductWire {
            id: line.product_id.as_str().to_owned(),
            name: line.name.clone(),
            price,
        },
        quantity: i64::from(line.quantity),
    })
}
