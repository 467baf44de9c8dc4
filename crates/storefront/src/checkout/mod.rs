//! Checkout orchestration.
//!
//! Turns a cart snapshot plus the customer's selections (payment method,
//! order type, delivery address) into a submitted order. The draft lives
//! only inside [`CheckoutOrchestrator`]: it is created when checkout begins,
//! survives a failed submission so the customer can resubmit, and is
//! finished by a confirmed one.
//!
//! Entry is gated on the cart total exceeding [`MINIMUM_ORDER_TOTAL`]; below
//! that the orchestrator refuses to start and no partial checkout exists.

pub mod delivery;
pub mod payment;

use std::future::Future;

use chrono::{DateTime, Local, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use greenbasket_core::Money;

use crate::api::ApiError;
use crate::config::UpiConfig;
use crate::types::{Address, Cart, Order, OrderType, PaymentMethod};

pub use delivery::{DELIVERY_CUTOFF_HOUR, expected_delivery_date};
pub use payment::{LaunchPaymentIntent, TracingPaymentLauncher, upi_intent_uri};

/// Minimum cart total required to enter checkout, in INR.
///
/// A total of exactly this value is still refused; the cart must exceed it.
pub const MINIMUM_ORDER_TOTAL: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Errors that can occur when starting a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart total does not exceed the minimum order threshold.
    #[error("cart total {total} does not exceed the minimum order total of ₹{MINIMUM_ORDER_TOTAL}")]
    BelowMinimum {
        /// The refused cart total.
        total: Money,
    },
}

/// Apply the minimum-order gate to a cart total.
pub(crate) fn check_minimum(total: Money) -> Result<(), CheckoutError> {
    if total.amount <= MINIMUM_ORDER_TOTAL {
        return Err(CheckoutError::BelowMinimum { total });
    }
    Ok(())
}

/// Boundary for posting a finalized order to the backend.
///
/// Implemented by [`crate::api::ApiClient`]; tests substitute fakes.
pub trait SubmitOrder {
    /// Submit a finalized order.
    fn submit_order(&self, order: &Order) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Where the checkout draft currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Nothing selected yet.
    Idle,
    /// Payment method chosen, order type still open.
    PaymentChosen,
    /// Order type chosen but the draft is not yet submittable.
    OrderTypeChosen,
    /// Home delivery chosen and no address selected yet.
    AddressRequired,
    /// All selections made; submit is available.
    ReadyToSubmit,
    /// A submission is in flight.
    Submitting,
    /// The backend accepted the order.
    Confirmed,
    /// The last submission failed; the draft is kept for resubmission.
    Failed,
}

/// Result of a [`CheckoutOrchestrator::submit`] call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The guard was not satisfied; nothing was sent. The caller should have
    /// disabled the submit action already.
    NotReady,
    /// The backend accepted the order.
    Confirmed(Order),
    /// Submission failed; the draft is preserved so the customer can retry.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminal {
    Confirmed,
    Failed,
}

/// State machine walking a cart snapshot through checkout.
pub struct CheckoutOrchestrator {
    cart: Cart,
    upi: UpiConfig,
    payment_method: Option<PaymentMethod>,
    order_type: Option<OrderType>,
    address: Option<Address>,
    expected_delivery: Option<NaiveDate>,
    submitting: bool,
    terminal: Option<Terminal>,
}

impl CheckoutOrchestrator {
    /// Begin checkout over a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::BelowMinimum`] when the cart total does not
    /// exceed [`MINIMUM_ORDER_TOTAL`]; checkout cannot be entered at all in
    /// that case.
    pub fn begin(cart: Cart, upi: UpiConfig) -> Result<Self, CheckoutError> {
        check_minimum(cart.total())?;
        Ok(Self {
            cart,
            upi,
            payment_method: None,
            order_type: None,
            address: None,
            expected_delivery: None,
            submitting: false,
            terminal: None,
        })
    }

    /// The cart snapshot this checkout was started from.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Selected payment method, if any.
    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Selected order type, if any.
    #[must_use]
    pub const fn order_type(&self) -> Option<OrderType> {
        self.order_type
    }

    /// Selected delivery address, if any.
    #[must_use]
    pub const fn selected_address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Expected delivery date, present once home delivery is selected.
    #[must_use]
    pub const fn expected_delivery(&self) -> Option<NaiveDate> {
        self.expected_delivery
    }

    /// Where the draft currently stands.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        if self.submitting {
            return CheckoutPhase::Submitting;
        }
        match self.terminal {
            Some(Terminal::Confirmed) => return CheckoutPhase::Confirmed,
            Some(Terminal::Failed) => return CheckoutPhase::Failed,
            None => {}
        }
        match (self.payment_method, self.order_type) {
            (None, None) => CheckoutPhase::Idle,
            (Some(_), None) => CheckoutPhase::PaymentChosen,
            (payment, Some(order_type)) => {
                if order_type == OrderType::HomeDelivery && self.address.is_none() {
                    CheckoutPhase::AddressRequired
                } else if payment.is_some() {
                    CheckoutPhase::ReadyToSubmit
                } else {
                    CheckoutPhase::OrderTypeChosen
                }
            }
        }
    }

    // =========================================================================
    // Selections
    // =========================================================================

    /// Choose how the customer pays. Does not by itself advance the draft
    /// past order-type selection.
    pub fn choose_payment_method(&mut self, method: PaymentMethod) {
        if !self.editable() {
            return;
        }
        self.payment_method = Some(method);
    }

    /// Choose how the order reaches the customer, using the device clock for
    /// the delivery-date rule.
    pub fn choose_order_type(&mut self, order_type: OrderType) {
        self.choose_order_type_at(order_type, Local::now());
    }

    /// Choose the order type with an explicit clock reading.
    ///
    /// Takeaway clears any previously selected address. Home delivery fixes
    /// the expected delivery date from `now`: before the 17:00 cutoff the
    /// order delivers today, after it tomorrow.
    pub fn choose_order_type_at(&mut self, order_type: OrderType, now: DateTime<Local>) {
        if !self.editable() {
            return;
        }
        self.order_type = Some(order_type);
        match order_type {
            OrderType::Takeaway => {
                self.address = None;
                self.expected_delivery = None;
            }
            OrderType::HomeDelivery => {
                self.expected_delivery = Some(expected_delivery_date(now));
            }
        }
    }

    /// Select the delivery address. Valid only while home delivery is the
    /// chosen order type; otherwise the call is ignored.
    pub fn select_address(&mut self, address: Address) {
        if !self.editable() {
            return;
        }
        if self.order_type != Some(OrderType::HomeDelivery) {
            tracing::debug!("address selection ignored outside home delivery");
            return;
        }
        self.address = Some(address);
    }

    /// A confirmed checkout is finished; a failed one reopens for edits.
    fn editable(&mut self) -> bool {
        match self.terminal {
            Some(Terminal::Confirmed) => false,
            Some(Terminal::Failed) => {
                self.terminal = None;
                true
            }
            None => true,
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submit the draft as an order.
    ///
    /// The guard requires a payment method and an order type, plus an address
    /// when the order type is home delivery. An unsatisfied guard is a no-op
    /// ([`SubmitOutcome::NotReady`]), not an error - the caller is expected
    /// to have disabled the submit action already.
    ///
    /// For UPI payments a `upi://pay` intent carrying the order total is
    /// fired best-effort before submission; no settlement confirmation is
    /// awaited or checked (documented limitation - the backend reconciles).
    ///
    /// On success the draft is finished and the order returned. On failure
    /// the error is logged and the draft preserved so the customer can
    /// resubmit; nothing is retried automatically. The remote cart is not
    /// cleared here - the backend does that when it accepts the order.
    #[instrument(skip_all, fields(owner = %self.cart.owner))]
    pub async fn submit<S, P>(&mut self, submitter: &S, payments: &P) -> SubmitOutcome
    where
        S: SubmitOrder,
        P: LaunchPaymentIntent,
    {
        if self.terminal == Some(Terminal::Confirmed) {
            return SubmitOutcome::NotReady;
        }
        let Some(order) = self.assemble_order() else {
            return SubmitOutcome::NotReady;
        };

        self.submitting = true;
        if order.payment_method == PaymentMethod::Upi {
            payments.launch(&upi_intent_uri(&self.upi, order.total));
        }

        let result = submitter.submit_order(&order).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                self.terminal = Some(Terminal::Confirmed);
                SubmitOutcome::Confirmed(order)
            }
            Err(e) => {
                tracing::error!(error = %e, "checkout submission failed");
                self.terminal = Some(Terminal::Failed);
                SubmitOutcome::Failed
            }
        }
    }

    /// Build the order payload when the guard is satisfied.
    fn assemble_order(&self) -> Option<Order> {
        let payment_method = self.payment_method?;
        let order_type = self.order_type?;

        let (address, expected_delivery) = match order_type {
            OrderType::HomeDelivery => {
                let address = self.address.clone()?;
                (Some(address), self.expected_delivery)
            }
            OrderType::Takeaway => (None, None),
        };

        Some(Order {
            owner: self.cart.owner.clone(),
            lines: self.cart.lines.clone(),
            total: self.cart.total(),
            payment_method,
            order_type,
            address,
            expected_delivery,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use greenbasket_core::{Email, ProductId};

    use crate::types::CartLine;

    use super::*;

    fn upi_config() -> UpiConfig {
        UpiConfig {
            payee_name: "GreenBasket".to_string(),
            payee_vpa: "greenbasket@oksbi".to_string(),
        }
    }

    fn cart(total_parts: &[(i64, u32)]) -> Cart {
        Cart {
            owner: Email::parse("shopper@example.com").unwrap(),
            lines: total_parts
                .iter()
                .enumerate()
                .map(|(i, &(price, quantity))| CartLine {
                    product_id: ProductId::new(format!("p{i}")),
                    name: format!("product {i}"),
                    unit_price: Money::inr(Decimal::from(price)),
                    quantity,
                })
                .collect(),
        }
    }

    fn checkout(total_parts: &[(i64, u32)]) -> CheckoutOrchestrator {
        CheckoutOrchestrator::begin(cart(total_parts), upi_config()).unwrap()
    }

    fn address() -> Address {
        Address {
            id: None,
            owner: Email::parse("shopper@example.com").unwrap(),
            house_no: "12".to_string(),
            street_name: "MG Road".to_string(),
            city: "Kochi".to_string(),
            district: "Ernakulam".to_string(),
            landmark: None,
            pincode: "682001".to_string(),
            mobile_number: "9876543210".to_string(),
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    /// Records submitted orders and answers from a scripted queue.
    #[derive(Default)]
    struct FakeSubmitter {
        submitted: Mutex<Vec<Order>>,
        fail_next: Mutex<bool>,
    }

    impl FakeSubmitter {
        fn failing_once() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                fail_next: Mutex::new(true),
            }
        }

        fn submissions(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    impl SubmitOrder for FakeSubmitter {
        async fn submit_order(&self, order: &Order) -> Result<(), ApiError> {
            self.submitted.lock().unwrap().push(order.clone());
            let mut fail = self.fail_next.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(ApiError::Rejected);
            }
            Ok(())
        }
    }

    /// Captures fired payment intent URIs.
    #[derive(Default)]
    struct FakeLauncher {
        uris: Mutex<Vec<String>>,
    }

    impl LaunchPaymentIntent for FakeLauncher {
        fn launch(&self, uri: &str) {
            self.uris.lock().unwrap().push(uri.to_string());
        }
    }

    // =========================================================================
    // Minimum-order gate
    // =========================================================================

    #[test]
    fn test_gate_refuses_total_of_exactly_500() {
        let result = CheckoutOrchestrator::begin(cart(&[(500, 1)]), upi_config());
        assert!(matches!(result, Err(CheckoutError::BelowMinimum { .. })));
    }

    #[test]
    fn test_gate_permits_total_of_501() {
        assert!(CheckoutOrchestrator::begin(cart(&[(501, 1)]), upi_config()).is_ok());
    }

    #[test]
    fn test_gate_refuses_below_threshold() {
        let result = CheckoutOrchestrator::begin(cart(&[(100, 2)]), upi_config());
        assert!(matches!(
            result,
            Err(CheckoutError::BelowMinimum { total }) if total.amount == Decimal::from(200)
        ));
    }

    // =========================================================================
    // Phases and selections
    // =========================================================================

    #[test]
    fn test_phase_progression() {
        let mut checkout = checkout(&[(300, 2)]);
        assert_eq!(checkout.phase(), CheckoutPhase::Idle);

        checkout.choose_payment_method(PaymentMethod::CashOnDelivery);
        assert_eq!(checkout.phase(), CheckoutPhase::PaymentChosen);

        checkout.choose_order_type_at(OrderType::Takeaway, noon());
        assert_eq!(checkout.phase(), CheckoutPhase::ReadyToSubmit);
    }

    #[test]
    fn test_order_type_alone_does_not_make_ready() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_order_type_at(OrderType::Takeaway, noon());
        assert_eq!(checkout.phase(), CheckoutPhase::OrderTypeChosen);
    }

    #[test]
    fn test_home_delivery_requires_address() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_payment_method(PaymentMethod::CashOnDelivery);
        checkout.choose_order_type_at(OrderType::HomeDelivery, noon());
        assert_eq!(checkout.phase(), CheckoutPhase::AddressRequired);

        checkout.select_address(address());
        assert_eq!(checkout.phase(), CheckoutPhase::ReadyToSubmit);
    }

    #[test]
    fn test_takeaway_clears_selected_address() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_payment_method(PaymentMethod::CashOnDelivery);
        checkout.choose_order_type_at(OrderType::HomeDelivery, noon());
        checkout.select_address(address());
        assert!(checkout.selected_address().is_some());

        checkout.choose_order_type_at(OrderType::Takeaway, noon());
        assert!(checkout.selected_address().is_none());
        assert!(checkout.expected_delivery().is_none());
    }

    #[test]
    fn test_address_selection_ignored_outside_home_delivery() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.select_address(address());
        assert!(checkout.selected_address().is_none());

        checkout.choose_order_type_at(OrderType::Takeaway, noon());
        checkout.select_address(address());
        assert!(checkout.selected_address().is_none());
    }

    #[test]
    fn test_home_delivery_fixes_expected_date() {
        let mut checkout = checkout(&[(300, 2)]);
        let evening = Local.with_ymd_and_hms(2026, 3, 10, 17, 1, 0).unwrap();
        checkout.choose_order_type_at(OrderType::HomeDelivery, evening);
        assert_eq!(
            checkout.expected_delivery(),
            Some(chrono::NaiveDate::from_ymd_opt(2026, 3, 11).unwrap())
        );
    }

    // =========================================================================
    // Submission
    // =========================================================================

    #[tokio::test]
    async fn test_submit_is_noop_without_selections() {
        let mut checkout = checkout(&[(300, 2)]);
        let submitter = FakeSubmitter::default();
        let launcher = FakeLauncher::default();

        let outcome = checkout.submit(&submitter, &launcher).await;
        assert!(matches!(outcome, SubmitOutcome::NotReady));
        assert_eq!(submitter.submissions(), 0);
        assert_eq!(checkout.phase(), CheckoutPhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_blocked_without_address_for_home_delivery() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_payment_method(PaymentMethod::CashOnDelivery);
        checkout.choose_order_type_at(OrderType::HomeDelivery, noon());

        let submitter = FakeSubmitter::default();
        let outcome = checkout.submit(&submitter, &FakeLauncher::default()).await;
        assert!(matches!(outcome, SubmitOutcome::NotReady));
        assert_eq!(submitter.submissions(), 0);
        assert_eq!(checkout.phase(), CheckoutPhase::AddressRequired);
    }

    #[tokio::test]
    async fn test_takeaway_cash_order_carries_total_without_address() {
        // Cart: one product, quantity 2, unit price 300 -> total 600
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_payment_method(PaymentMethod::CashOnDelivery);
        checkout.choose_order_type_at(OrderType::Takeaway, noon());

        let submitter = FakeSubmitter::default();
        let launcher = FakeLauncher::default();
        let outcome = checkout.submit(&submitter, &launcher).await;

        let SubmitOutcome::Confirmed(order) = outcome else {
            panic!("expected confirmation");
        };
        assert_eq!(order.total.amount, Decimal::from(600));
        assert!(order.address.is_none());
        assert!(order.expected_delivery.is_none());
        assert_eq!(checkout.phase(), CheckoutPhase::Confirmed);
        // Cash orders never fire a payment intent
        assert!(launcher.uris.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upi_intent_carries_order_total() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_payment_method(PaymentMethod::Upi);
        checkout.choose_order_type_at(OrderType::Takeaway, noon());

        let submitter = FakeSubmitter::default();
        let launcher = FakeLauncher::default();
        checkout.submit(&submitter, &launcher).await;

        let uris = launcher.uris.lock().unwrap();
        assert_eq!(uris.len(), 1);
        assert!(uris[0].ends_with("&am=600.00"));
    }

    #[tokio::test]
    async fn test_failed_submit_preserves_draft_for_resubmission() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_payment_method(PaymentMethod::CashOnDelivery);
        checkout.choose_order_type_at(OrderType::Takeaway, noon());

        let submitter = FakeSubmitter::failing_once();
        let launcher = FakeLauncher::default();

        let outcome = checkout.submit(&submitter, &launcher).await;
        assert!(matches!(outcome, SubmitOutcome::Failed));
        assert_eq!(checkout.phase(), CheckoutPhase::Failed);
        // Selections survive the failure
        assert_eq!(
            checkout.payment_method(),
            Some(PaymentMethod::CashOnDelivery)
        );

        let outcome = checkout.submit(&submitter, &launcher).await;
        assert!(matches!(outcome, SubmitOutcome::Confirmed(_)));
        assert_eq!(submitter.submissions(), 2);
    }

    #[tokio::test]
    async fn test_confirmed_checkout_cannot_resubmit() {
        let mut checkout = checkout(&[(300, 2)]);
        checkout.choose_payment_method(PaymentMethod::CashOnDelivery);
        checkout.choose_order_type_at(OrderType::Takeaway, noon());

        let submitter = FakeSubmitter::default();
        let launcher = FakeLauncher::default();
        checkout.submit(&submitter, &launcher).await;
        let outcome = checkout.submit(&submitter, &launcher).await;

        assert!(matches!(outcome, SubmitOutcome::NotReady));
        assert_eq!(submitter.submissions(), 1);
    }
}
