//! Outbound job model.

use serde::{Deserialize, Serialize};

use super::error::DispatchError;
use crate::messaging::MediaRef;

/// A serialized instruction describing one outbound message.
///
/// This is the wire shape producers publish on the job channel: UTF-8 JSON
/// with camelCase fields, no envelope, no schema version, no correlation id.
/// A job is consumed exactly once, never mutated, and discarded after
/// processing.
///
/// Invariants (checked by [`Job::recipient`] and [`Job::payload`] before any
/// external call): a recipient identifier must be present, and exactly one
/// of `textBody`/`templateName` must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Recipient phone number, already known to the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
    /// Opaque contact reference to resolve into a phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_ref: Option<String>,
    /// Free-form text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    /// Name of an approved template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    /// Positional parameters for the template body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_body_params: Vec<String>,
    /// Positional parameters for template buttons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_button_params: Vec<String>,
    /// Media attached to the template header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<MediaRef>,
}

/// Recipient identifier carried by a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient<'a> {
    /// A phone number supplied directly by the producer.
    Phone(&'a str),
    /// A contact reference to resolve through the datastore.
    Contact(&'a str),
}

/// Message payload carried by a job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// Free-form text message.
    Text(&'a str),
    /// Approved template message.
    Template {
        /// Template name.
        name: &'a str,
        /// Body parameters in declaration order.
        body_params: &'a [String],
        /// Button parameters in declaration order.
        button_params: &'a [String],
        /// Optional header media.
        media: Option<&'a MediaRef>,
    },
}

impl Job {
    /// Extract the recipient identifier.
    ///
    /// A directly supplied phone number takes precedence over a contact
    /// reference when a producer sets both.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when neither identifier is present.
    pub fn recipient(&self) -> Result<Recipient<'_>, DispatchError> {
        match (&self.recipient_phone, &self.contact_ref) {
            (Some(phone), _) => Ok(Recipient::Phone(phone)),
            (None, Some(contact_ref)) => Ok(Recipient::Contact(contact_ref)),
            (None, None) => Err(DispatchError::validation(
                "job carries neither recipientPhone nor contactRef",
            )),
        }
    }

    /// Extract the message payload.
    ///
    /// # Errors
    ///
    /// Fails with a validation error unless exactly one of `textBody` and
    /// `templateName` is present.
    pub fn payload(&self) -> Result<Payload<'_>, DispatchError> {
        match (&self.text_body, &self.template_name) {
            (Some(_), Some(_)) => Err(DispatchError::validation(
                "job carries both textBody and templateName",
            )),
            (None, None) => Err(DispatchError::validation(
                "job carries neither textBody nor templateName",
            )),
            (Some(body), None) => Ok(Payload::Text(body)),
            (None, Some(name)) => Ok(Payload::Template {
                name,
                body_params: &self.template_body_params,
                button_params: &self.template_button_params,
                media: self.media_ref.as_ref(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_camel_case() {
        let raw = r#"{
            "contactRef": "c1",
            "templateName": "welcome",
            "templateBodyParams": ["Asha"],
            "mediaRef": {"url": "https://cdn.example.com/a.pdf", "filename": "a.pdf"}
        }"#;

        let job: Job = serde_json::from_str(raw).expect("valid job payload");
        assert_eq!(job.contact_ref.as_deref(), Some("c1"));
        assert_eq!(job.template_name.as_deref(), Some("welcome"));
        assert_eq!(job.template_body_params, vec!["Asha".to_string()]);
        assert!(job.template_button_params.is_empty());
        assert_eq!(job.media_ref.as_ref().unwrap().filename.as_deref(), Some("a.pdf"));
    }

    #[test]
    fn test_recipient_requires_an_identifier() {
        let job = Job::default();
        assert!(matches!(
            job.recipient(),
            Err(DispatchError::Validation(_))
        ));
    }

    #[test]
    fn test_recipient_phone_takes_precedence() {
        let job = Job {
            recipient_phone: Some("+15551234567".to_string()),
            contact_ref: Some("c1".to_string()),
            ..Job::default()
        };
        assert_eq!(job.recipient().unwrap(), Recipient::Phone("+15551234567"));
    }

    #[test]
    fn test_payload_rejects_both_kinds() {
        let job = Job {
            text_body: Some("hi".to_string()),
            template_name: Some("welcome".to_string()),
            ..Job::default()
        };
        assert!(matches!(job.payload(), Err(DispatchError::Validation(_))));
    }

    #[test]
    fn test_payload_rejects_neither_kind() {
        let job = Job {
            recipient_phone: Some("+15551234567".to_string()),
            ..Job::default()
        };
        assert!(matches!(job.payload(), Err(DispatchError::Validation(_))));
    }

    #[test]
    fn test_payload_text() {
        let job = Job {
            text_body: Some("Hi there".to_string()),
            ..Job::default()
        };
        assert_eq!(job.payload().unwrap(), Payload::Text("Hi there"));
    }
}
