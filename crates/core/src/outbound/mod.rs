//! Outbound message pipeline.
//!
//! A producer publishes a [`Job`] as plain JSON on the job channel; the
//! worker hands it to the [`OutboundDispatcher`], which resolves the real
//! recipient, picks the message shape (text vs. approved template), and
//! calls the messaging client.

mod dispatcher;
mod error;
mod job;

pub use dispatcher::OutboundDispatcher;
pub use error::DispatchError;
pub use job::{Job, Payload, Recipient};
