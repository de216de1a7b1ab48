//! Outbound dispatcher implementation.

use std::sync::Arc;

use courier_shared::PhoneNumber;

use super::error::DispatchError;
use super::job::{Job, Payload, Recipient};
use crate::contact::ContactResolver;
use crate::messaging::{MessageHandle, MessagingClient};

/// Decides the message shape for a job, binds parameters, and calls the
/// messaging client.
///
/// Dependencies are injected once at construction so tests can substitute
/// fakes for the resolver and the client.
pub struct OutboundDispatcher<R: ContactResolver, M: MessagingClient> {
    resolver: Arc<R>,
    client: Arc<M>,
}

impl<R: ContactResolver, M: MessagingClient> OutboundDispatcher<R, M> {
    /// Create a new dispatcher.
    #[must_use]
    pub fn new(resolver: Arc<R>, client: Arc<M>) -> Self {
        Self { resolver, client }
    }

    /// Dispatch one job.
    ///
    /// Validates the job invariants before any external call, resolves and
    /// normalizes the recipient, then sends either a free-form text or an
    /// approved template message. Errors bubble to the caller; the worker is
    /// the boundary that logs and discards.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Validation`] for a malformed job
    /// - [`DispatchError::ContactNotFound`] when the reference resolves to nothing
    /// - [`DispatchError::Upstream`] when the provider rejects the send
    pub async fn dispatch(&self, job: &Job) -> Result<MessageHandle, DispatchError> {
        let payload = job.payload()?;
        let recipient = job.recipient()?;

        let phone = match recipient {
            Recipient::Phone(raw) => PhoneNumber::normalize(raw),
            Recipient::Contact(contact_ref) => {
                let raw = self.resolver.resolve(contact_ref).await?;
                PhoneNumber::normalize(&raw)
            }
        };

        let handle = match payload {
            Payload::Text(body) => self.client.send_text(&phone, body).await?,
            Payload::Template {
                name,
                body_params,
                button_params,
                media,
            } => {
                self.client
                    .send_template(&phone, name, body_params, button_params, media)
                    .await?
            }
        };

        Ok(handle)
    }
}
