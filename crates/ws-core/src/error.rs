use thiserror::Error;

pub type WsResult<T> = Result<T, WsError>;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unparsable timestamp: {text:?}")]
    Timestamp { text: String },
}
