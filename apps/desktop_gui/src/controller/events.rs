//! Worker-to-UI events and error modeling for the directory viewer.

use directory_client::FetchError;
use directory_core::UserRecord;

use crate::ui::app::AvatarImage;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    UsersLoaded {
        records: Vec<UserRecord>,
    },
    AvatarLoaded {
        email: String,
        image: AvatarImage,
    },
    AvatarFailed {
        email: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Status,
    Decode,
    Config,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    WorkerStartup,
    DirectoryFetch,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Status => "Service",
        UiErrorCategory::Decode => "Response",
        UiErrorCategory::Config => "Configuration",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// Friendly one-line banner text for a failed directory fetch.
pub fn classify_fetch_failure(error: &UiError) -> String {
    match error.category() {
        UiErrorCategory::Transport => {
            "Directory service unreachable; check the network and retry.".to_string()
        }
        UiErrorCategory::Status => format!(
            "The directory service rejected the request: {}.",
            error.message()
        ),
        UiErrorCategory::Decode => {
            "The directory service answered with an unexpected payload.".to_string()
        }
        UiErrorCategory::Config => format!(
            "Directory endpoint misconfigured: {}. Fix the endpoint and relaunch.",
            error.message()
        ),
        UiErrorCategory::Unknown => format!("Directory error: {}", error.message()),
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Classification straight off the typed client error.
    pub fn from_fetch(context: UiErrorContext, error: &FetchError) -> Self {
        let category = match error {
            FetchError::InvalidUrl { .. } => UiErrorCategory::Config,
            FetchError::Transport { .. } => UiErrorCategory::Transport,
            FetchError::Status { .. } => UiErrorCategory::Status,
            FetchError::Decode { .. } => UiErrorCategory::Decode,
        };
        Self {
            category,
            context,
            message: error.to_string(),
        }
    }

    /// Fallback classification for failures that only exist as text, such
    /// as worker startup problems.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("timed out")
            || message_lower.contains("unavailable")
            || message_lower.contains("unreachable")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("status") {
            UiErrorCategory::Status
        } else if message_lower.contains("invalid") || message_lower.contains("malformed") {
            UiErrorCategory::Config
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_client::{DirectoryClient, StatusCode};

    #[test]
    fn typed_url_errors_map_to_the_config_category() {
        let err = DirectoryClient::new("not a url", 1).expect_err("invalid endpoint");
        let ui_err = UiError::from_fetch(UiErrorContext::WorkerStartup, &err);

        assert_eq!(ui_err.category(), UiErrorCategory::Config);
        assert_eq!(ui_err.context(), UiErrorContext::WorkerStartup);
        assert!(ui_err.message().contains("not a url"));
    }

    #[test]
    fn typed_status_errors_map_to_the_status_category() {
        let err = FetchError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        let ui_err = UiError::from_fetch(UiErrorContext::DirectoryFetch, &err);

        assert_eq!(ui_err.category(), UiErrorCategory::Status);
        assert_eq!(ui_err.context(), UiErrorContext::DirectoryFetch);
    }

    #[test]
    fn textual_connection_failures_classify_as_transport() {
        let ui_err = UiError::from_message(
            UiErrorContext::WorkerStartup,
            "directory worker startup failure: connection refused",
        );
        assert_eq!(ui_err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn unrecognized_failures_fall_back_to_unknown() {
        let ui_err = UiError::from_message(UiErrorContext::DirectoryFetch, "boom");
        assert_eq!(ui_err.category(), UiErrorCategory::Unknown);
        assert_eq!(classify_fetch_failure(&ui_err), "Directory error: boom");
    }

    #[test]
    fn transport_failures_get_an_actionable_banner_message() {
        let ui_err = UiError::from_message(UiErrorContext::DirectoryFetch, "network is down");
        assert_eq!(
            classify_fetch_failure(&ui_err),
            "Directory service unreachable; check the network and retry."
        );
    }
}
