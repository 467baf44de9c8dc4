//! GreenBasket Storefront library.
//!
//! The cart/checkout core of the GreenBasket grocery delivery client. The
//! backend is the source of truth for the cart; this crate keeps a local view
//! synchronized with it, derives totals, enforces order-eligibility rules,
//! and walks a checkout draft through payment-method, order-type, and address
//! selection to a submitted order.
//!
//! Screen rendering, navigation, and session authentication live in the UI
//! shell that embeds this crate; every component here takes its session and
//! configuration explicitly at construction.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod addresses;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod session;
pub mod types;
