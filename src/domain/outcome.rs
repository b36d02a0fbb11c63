use super::errors::DomainError;

pub const IN_PROGRESS_MESSAGE: &str = "Creating invoice...";
pub const SUCCESS_MESSAGE: &str = "Invoice created successfully!";
pub const FAILURE_MESSAGE: &str = "Failed to create invoice.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    None,
    InProgress,
    Succeeded,
    Failed,
}

/// Result of the latest submit attempt. Each attempt replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    pub message: String,
    /// Set only on success.
    pub artifact_url: Option<String>,
}

impl SubmissionOutcome {
    pub fn in_progress() -> Self {
        Self {
            status: SubmissionStatus::InProgress,
            message: IN_PROGRESS_MESSAGE.to_string(),
            artifact_url: None,
        }
    }

    pub fn succeeded(artifact_url: impl Into<String>) -> Self {
        Self {
            status: SubmissionStatus::Succeeded,
            message: SUCCESS_MESSAGE.to_string(),
            artifact_url: Some(artifact_url.into()),
        }
    }

    /// Precondition and validation failures keep their own message; anything
    /// raised by the chain client is reported generically.
    pub fn failed(error: &DomainError) -> Self {
        let message = match error {
            DomainError::ClientOrAddressMissing | DomainError::InvalidAddressFormat => {
                error.to_string()
            }
            _ => FAILURE_MESSAGE.to_string(),
        };
        Self {
            status: SubmissionStatus::Failed,
            message,
            artifact_url: None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SubmissionStatus::InProgress
    }
}
