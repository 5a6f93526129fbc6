use crate::profile::ProfileError;
use corim_core::{
    choice::ChoiceError, codec::CodecError, config::ConfigError, error::ErrorKind, extension::AttachError,
    validate::ValidateError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// Everything a [`Session`](crate::Session) call can fail with.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Attach(#[from] AttachError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Codec(err) => err.kind(),
            Self::Validate(err) => err.kind(),
            Self::Choice(err) => err.kind(),
            Self::Profile(err) => err.kind(),
            Self::Attach(err) => err.kind(),
            Self::Config(err) => err.kind(),
        }
    }
}
