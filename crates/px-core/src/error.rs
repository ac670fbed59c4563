use thiserror::Error;

pub type PxResult<T> = Result<T, PxError>;

#[derive(Error, Debug)]
pub enum PxError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Not implemented: {what}")]
    NotImplemented { what: String },
}
