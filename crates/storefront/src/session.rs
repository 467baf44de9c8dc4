//! Session handle for the signed-in customer.
//!
//! The original client kept the signed-in user in an ambient context shared
//! by every screen. Here the session is an explicit value injected into each
//! component at construction; nothing in this crate reaches for global state.

use greenbasket_core::Email;

/// The signed-in customer's session.
///
/// Authentication itself is out of scope: the UI shell performs login and
/// hands this crate an already-validated email identifying the customer.
/// The session lives for the whole app run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: Email,
}

impl Session {
    /// Create a session for a signed-in customer.
    #[must_use]
    pub const fn new(user: Email) -> Self {
        Self { user }
    }

    /// The customer this session belongs to.
    #[must_use]
    pub const fn user(&self) -> &Email {
        &self.user
    }
}
