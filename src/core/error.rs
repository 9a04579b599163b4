use thiserror::Error;

/// Which externally supplied document failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    Base,
    Override,
}

impl std::fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSource::Base => write!(f, "base"),
            DocumentSource::Override => write!(f, "override"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to parse {source_doc} policy document: {error}")]
    Parse {
        source_doc: DocumentSource,
        #[source]
        error: serde_json::Error,
    },

    #[error("Found duplicate sid ({0}), either remove the sid or ensure the sid is unique across all statements")]
    DuplicateSid(String),

    #[error("Found variable expression in {value:?}, policy variables are not supported by policy version {version}")]
    UnsupportedVariable { value: String, version: String },

    #[error("Error reading values of condition {test} on {variable}: {reason}")]
    ConditionValue {
        test: String,
        variable: String,
        reason: String,
    },

    #[error("Invalid statement declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Encoded document is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Invalid declaration file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PolicyError {
    pub(crate) fn parse(source_doc: DocumentSource, error: serde_json::Error) -> Self {
        PolicyError::Parse { source_doc, error }
    }
}

pub type Result<T> = std::result::Result<T, PolicyError>;
