/// Lookup request envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleRequest {
    /// Exact, case-sensitive note title
    pub title: String,
}

/// Author filter used by the streaming call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    /// Accepted but not used for matching
    pub nickname: String,
    /// Author mail, compared exactly
    pub mail: String,
}
