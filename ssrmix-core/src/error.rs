use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {reason} (token {token:?}){}", line_suffix(.line))]
    Decode {
        token: String,
        reason: String,
        /// Raw link the token was taken from, when known.
        line: Option<String>,
    },

    #[error("malformed link: {reason} ({link:?})")]
    MalformedLink { link: String, reason: String },

    #[error("missing field `{field}` in link {link:?}")]
    MissingField { link: String, field: &'static str },

    #[error("quota parse error: {reason} (remarks {remarks:?})")]
    QuotaParse { remarks: String, reason: String },

    #[error("date parse error: {reason} (text {text:?})")]
    DateParse { text: String, reason: String },

    #[error("no load entry for node `{id}`")]
    LoadLookup { id: String },

    #[error("subscription has {lines} line(s); the quota and expiry lines are required")]
    MissingMeta { lines: usize },

    #[error("config error: {0}")]
    Config(String),
}

fn line_suffix(line: &Option<String>) -> String {
    line.as_ref()
        .map(|l| format!(" in line {l:?}"))
        .unwrap_or_default()
}

impl SsrError {
    /// Attach the raw link to a decode error that does not name one yet.
    pub fn in_line(self, raw: &str) -> Self {
        match self {
            SsrError::Decode {
                token,
                reason,
                line: None,
            } => SsrError::Decode {
                token,
                reason,
                line: Some(raw.to_string()),
            },
            other => other,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, SsrError>;
