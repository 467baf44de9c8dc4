//! Saved delivery addresses for the signed-in customer.
//!
//! Create-and-list only; nothing upstream ever edits or deletes an address.
//! Validation happens entirely client-side before a create request is sent,
//! and a created address joins the in-memory list optimistically so checkout
//! can offer it without waiting for a refetch.

use thiserror::Error;
use tracing::instrument;

use greenbasket_core::Email;

use crate::api::{ApiClient, ApiError};
use crate::session::Session;
use crate::types::{Address, AddressDraft};

/// Errors that can occur when managing addresses.
#[derive(Debug, Error)]
pub enum AddressError {
    /// A required form field was left empty. Caught before any network call.
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    /// The backend request failed; the form draft should be retained so the
    /// customer can retry.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The customer's address book.
pub struct AddressBook {
    api: ApiClient,
    owner: Email,
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Create an address book for the signed-in customer. The list starts
    /// empty until the first [`refresh`](Self::refresh).
    #[must_use]
    pub fn new(api: ApiClient, session: &Session) -> Self {
        Self {
            api,
            owner: session.user().clone(),
            addresses: Vec::new(),
        }
    }

    /// Addresses currently known to the client.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Fetch the customer's addresses from the backend.
    ///
    /// Having no saved addresses is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the previously fetched list is
    /// retained in that case.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn refresh(&mut self) -> Result<&[Address], ApiError> {
        match self.api.list_addresses(&self.owner).await {
            Ok(addresses) => {
                self.addresses = addresses;
                Ok(&self.addresses)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch addresses");
                Err(e)
            }
        }
    }

    /// Validate and persist a new address.
    ///
    /// All fields except `landmark` must be non-empty; validation failures
    /// block the request before any network call. On success the address is
    /// appended to the in-memory list immediately, in addition to being
    /// persisted remotely. On failure the caller should keep the form draft
    /// so the customer can correct and retry.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] on an empty required field, or
    /// [`AddressError::Api`] if the backend rejects the request.
    #[instrument(skip(self, draft), fields(owner = %self.owner))]
    pub async fn create(&mut self, draft: AddressDraft) -> Result<Address, AddressError> {
        let address = validate_draft(&self.owner, draft)?;

        self.api.create_address(&address).await?;

        self.addresses.push(address.clone());
        Ok(address)
    }
}

/// Check required fields and assemble the domain address.
fn validate_draft(owner: &Email, draft: AddressDraft) -> Result<Address, AddressError> {
    require(&draft.house_no, "houseNo")?;
    require(&draft.street_name, "streetName")?;
    require(&draft.city, "city")?;
    require(&draft.district, "district")?;
    require(&draft.pincode, "pincode")?;
    require(&draft.mobile_number, "mobileNumber")?;

    // An empty landmark means the customer skipped the optional field
    let landmark = draft.landmark.filter(|l| !l.trim().is_empty());

    Ok(Address {
        id: None,
        owner: owner.clone(),
        house_no: draft.house_no,
        street_name: draft.street_name,
        city: draft.city,
        district: draft.district,
        landmark,
        pincode: draft.pincode,
        mobile_number: draft.mobile_number,
    })
}

fn require(value: &str, field: &'static str) -> Result<(), AddressError> {
    if value.trim().is_empty() {
        return Err(AddressError::MissingField(field));
    }
    Ok(())
}
