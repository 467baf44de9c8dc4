//! UPI payment intent.
//!
//! When the customer pays by UPI, the client builds a `upi://pay` deep link
//! and hands it to the platform so an installed payment app can take over.
//! This is strictly one-way: no callback or settlement confirmation ever
//! comes back, and order submission proceeds regardless. Reconciliation of
//! unpaid UPI orders is the backend's problem, not this client's.

use greenbasket_core::Money;

use crate::config::UpiConfig;

/// Build the `upi://pay` deep link for an order.
///
/// The amount is the actual order total, formatted with two decimal places
/// as payment apps expect.
#[must_use]
pub fn upi_intent_uri(config: &UpiConfig, total: Money) -> String {
    format!(
        "upi://pay?pn={}&pa={}&cu={}&am={:.2}",
        urlencoding::encode(&config.payee_name),
        urlencoding::encode(&config.payee_vpa),
        total.currency_code.code(),
        total.amount
    )
}

/// Platform hook that fires a payment intent.
///
/// The real implementation lives in the UI shell (it hands the URI to the
/// operating system); this crate only ever launches best-effort and never
/// waits for a result.
pub trait LaunchPaymentIntent {
    /// Fire the deep link. Must not block.
    fn launch(&self, uri: &str);
}

/// Launcher that records the intent in the log and nothing else.
///
/// Useful as a default where no platform integration exists (tests, server-
/// side tooling).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPaymentLauncher;

impl LaunchPaymentIntent for TracingPaymentLauncher {
    fn launch(&self, uri: &str) {
        tracing::info!(uri = %uri, "payment intent launched");
    }
}
