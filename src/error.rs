#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch answer key: {0}")]
    Fetch(#[from] gloo_net::Error),
    #[error("answer key request failed with status {0}")]
    Status(u16),
    #[error("answer key is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("answer set '{0}' not found")]
    MissingAnswerSet(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("answer-set attribute is empty")]
    EmptyAnswerSet,
    #[error("src attribute is empty")]
    EmptySource,
    #[error("unknown unmatched policy '{0}' (expected 'incorrect' or 'omit')")]
    UnknownUnmatchedPolicy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("no tags selected")]
    NothingSelected,
    #[error("answers already submitted")]
    AlreadySubmitted,
}
