//! Raw wire shapes for the GreenBasket backend REST API.
//!
//! Every endpoint response is decoded through these types so a malformed
//! payload fails fast with a typed error instead of leaking undefined values
//! into state. Field names mirror the backend's JSON contract exactly;
//! conversion to domain types happens in [`super::conversions`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Cart
// =============================================================================

/// Catalog product as embedded in cart entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWire {
    /// Backend document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Product display name.
    pub name: String,
    /// Unit price as a JSON number.
    pub price: f64,
}

/// One entry of `GET /cart/{email}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntryWire {
    /// The product, with its price snapshot.
    pub product: ProductWire,
    /// Units of the product in the cart.
    pub quantity: i64,
}

/// Body of `PUT /cart/{email}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdateRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// Body of `POST /cart/add`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAddRequest {
    pub product_id: String,
    pub email: String,
    pub quantity: u32,
}

// =============================================================================
// Addresses
// =============================================================================

/// Address document, both as listed by `GET /api/users/{email}/addresses`
/// and as posted to `POST /api/addresses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressWire {
    /// Backend identifier; absent when posting a new address.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning customer's email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub house_no: String,
    pub street_name: String,
    pub city: String,
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    pub pincode: String,
    pub mobile_number: String,
}

// =============================================================================
// Checkout
// =============================================================================

/// Body of `POST /checkout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_email: String,
    /// Cart snapshot in the same shape the cart endpoint serves.
    pub products: Vec<CartEntryWire>,
    pub total_amount: f64,
    pub payment_method: &'static str,
    pub order_type: &'static str,
    /// Present exactly for home delivery orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressWire>,
}

/// Response of `POST /checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutResponse {
    pub success: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_cart_entries() {
        let body = r#"[
            {"product": {"_id": "p1", "name": "Basmati Rice 1kg", "price": 300}, "quantity": 2},
            {"product": {"_id": "p2", "name": "Toor Dal", "price": 45.5, "image": {"data": []}}, "quantity": 1}
        ]"#;
        let entries: Vec<CartEntryWire> = serde_json::from_str(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product.id, "p1");
        assert_eq!(entries[0].quantity, 2);
        // Unknown fields like image blobs are ignored
        assert!((entries[1].product.price - 45.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_rejects_missing_price() {
        let body = r#"[{"product": {"_id": "p1", "name": "Rice"}, "quantity": 2}]"#;
        let result: Result<Vec<CartEntryWire>, _> = serde_json::from_str(body);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_non_numeric_quantity() {
        let body = r#"[{"product": {"_id": "p1", "name": "Rice", "price": 10}, "quantity": "two"}]"#;
        let result: Result<Vec<CartEntryWire>, _> = serde_json::from_str(body);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_address_with_and_without_landmark() {
        let body = r#"[
            {"_id": "a1", "userEmail": "s@example.com", "houseNo": "12", "streetName": "MG Road",
             "city": "Kochi", "district": "Ernakulam", "landmark": "Near temple",
             "pincode": "682001", "mobileNumber": "9876543210"},
            {"houseNo": "7B", "streetName": "Beach Rd", "city": "Chennai",
             "district": "Chennai", "pincode": "600001", "mobileNumber": "9000000000"}
        ]"#;
        let addresses: Vec<AddressWire> = serde_json::from_str(body).unwrap();
        assert_eq!(addresses[0].id.as_deref(), Some("a1"));
        assert_eq!(addresses[0].landmark.as_deref(), Some("Near temple"));
        assert!(addresses[1].id.is_none());
        assert!(addresses[1].landmark.is_none());
    }

    #[test]
    fn test_checkout_request_omits_absent_address() {
        let request = CheckoutRequest {
            user_email: "s@example.com".to_string(),
            products: vec![],
            total_amount: 600.0,
            payment_method: "Cash",
            order_type: "Takeaway",
            address: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("address").is_none());
        assert_eq!(json["userEmail"], "s@example.com");
        assert_eq!(json["orderType"], "Takeaway");
    }

    #[test]
    fn test_decode_checkout_response() {
        let ok: CheckoutResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ok.success);
        let rejected: CheckoutResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!rejected.success);
    }

    #[test]
    fn test_cart_update_request_field_names() {
        let request = CartUpdateRequest {
            product_id: "p1".to_string(),
            quantity: 3,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["productId"], "p1");
        assert_eq!(json["quantity"], 3);
    }
}
