use crate::domain::EmailAddress;

/// A bulk send: one subject and body, delivered to every recipient in order.
#[derive(Debug)]
pub struct SendRequest {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<EmailAddress>,
}
