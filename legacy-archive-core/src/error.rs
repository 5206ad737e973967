/// Errors that can occur while reading or writing content records.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Front matter is missing its closing '---' line")]
    UnterminatedHeader,

    #[error("Front matter is not a mapping")]
    NotAMapping,
}
