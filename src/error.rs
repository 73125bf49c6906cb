use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A constructor record was found without a class record to attach it to.
    #[error("cannot have constructor dox without class dox in {filename}")]
    MissingClass { filename: String },
}

pub type Result<T> = std::result::Result<T, Error>;
