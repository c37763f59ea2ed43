//! Prompt configuration submitted with each authentication request.

/// Text shown by the authentication prompt for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContent {
    /// Headline of the prompt dialog.
    pub title: String,
    /// Secondary line under the title.
    pub subtitle: String,
    /// Longer explanation of why authentication is needed.
    pub description: String,
    /// Label of the button that abandons the attempt.
    pub cancel_label: String,
}

/// A single authentication request handed to the authentication service.
///
/// The id is a per-gate sequence number; outcomes delivered for this request
/// carry it so the gate can correlate them.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub id: u64,
    pub prompt: PromptContent,
}
