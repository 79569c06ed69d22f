use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 响应体在错误信息中最多保留的字符数
const BODY_SNIPPET_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum QrandError {
    #[error("number of bytes must be at most {limit} (API limit): {requested}")]
    SizeLimitExceeded { limit: usize, requested: usize },

    #[error("request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("unauthorized: the API key was rejected")]
    Unauthorized,

    #[error("unexpected response status {status}: {body:?}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("reading response body: {0}")]
    BodyRead(#[source] BoxError),

    #[error("decoding error for {body:?}: {source}")]
    InvalidResponse {
        body: String,
        #[source]
        source: DecodeError,
    },

    #[error("invalid base url `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no API key configured")]
    MissingApiKey,
}

impl QrandError {
    pub(crate) fn unexpected_status(status: u16, body: &[u8]) -> Self {
        Self::UnexpectedStatus {
            status,
            body: snippet(body),
        }
    }

    pub(crate) fn invalid_response(body: &[u8], source: DecodeError) -> Self {
        Self::InvalidResponse {
            body: snippet(body),
            source,
        }
    }
}

pub(crate) fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_SNIPPET_LEN)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("no `data` field found in response: {0}")]
    MissingField(String),

    #[error("want an array for `data`, got {kind}: {value}")]
    WrongType { kind: &'static str, value: String },

    #[error("not enough `data` elements in response")]
    EmptyData,

    #[error("element `{value}` at index {idx} in data should be a number, but is {kind}")]
    ElementNotNumeric {
        idx: usize,
        kind: &'static str,
        value: String,
    },

    #[error("element `{value}` at index {idx} is too big for a byte")]
    ByteOutOfRange { idx: usize, value: f64 },
}
