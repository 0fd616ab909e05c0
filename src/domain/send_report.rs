use crate::domain::EmailAddress;

const DELIVERED_MESSAGE: &str = "Email sent successfully";

/// Outcome of the delivery attempt to a single recipient
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SendResult {
    email: String,
    success: bool,
    message: String,
}

impl SendResult {
    pub fn delivered(recipient: &EmailAddress) -> Self {
        Self {
            email: recipient.as_ref().to_owned(),
            success: true,
            message: DELIVERED_MESSAGE.to_owned(),
        }
    }

    pub fn failed(recipient: &EmailAddress, message: String) -> Self {
        Self {
            email: recipient.as_ref().to_owned(),
            success: false,
            message,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Aggregated outcome of a bulk send.
///
/// The counters are derived from `results` and never set independently, so
/// `total == successful + failed == results.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SendReport {
    total: usize,
    successful: usize,
    failed: usize,
    results: Vec<SendResult>,
}

impl SendReport {
    pub fn from_results(results: Vec<SendResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn successful(&self) -> usize {
        self.successful
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn results(&self) -> &[SendResult] {
        &self.results
    }
}
