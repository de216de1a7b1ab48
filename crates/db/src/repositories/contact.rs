//! Contact repository for phone number resolution.

use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::entities::contacts;
use courier_core::contact::{ContactError, ContactResolver};

/// Contact resolver implementation over the contacts table.
///
/// Pure read: no caching, no retry.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    db: DatabaseConnection,
}

impl ContactRepository {
    /// Create a new contact repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ContactResolver for ContactRepository {
    async fn resolve(&self, contact_ref: &str) -> Result<String, ContactError> {
        // A reference that is not a UUID cannot match any contact.
        let Ok(id) = Uuid::parse_str(contact_ref) else {
            return Err(ContactError::not_found(contact_ref));
        };

        let contact = contacts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ContactError::repository(e.to_string()))?
            .ok_or_else(|| ContactError::not_found(contact_ref))?;

        contact
            .phone
            .ok_or_else(|| ContactError::not_found(contact_ref))
    }
}
