//! Contact resolver contract.

use super::error::ContactError;

/// Maps an opaque contact reference to a phone number.
///
/// This trait is implemented by the db crate as a pure read against the
/// contacts table: no caching, no retry. Fails with
/// [`ContactError::NotFound`] when no contact matches the reference or the
/// contact has no phone on record.
pub trait ContactResolver: Send + Sync {
    /// Resolve a contact reference to a raw phone number.
    fn resolve(
        &self,
        contact_ref: &str,
    ) -> impl std::future::Future<Output = Result<String, ContactError>> + Send;
}
