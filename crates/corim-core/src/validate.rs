use crate::{choice::ChoiceError, error::ErrorKind, extension::ExtensionError};
use thiserror::Error as ThisError;

///
/// ValidateError
///
/// Validation failures carry the path of fields they were found under.
/// Hook failures are carried verbatim.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidateError {
    #[error("{field} validation failed: {source}")]
    Field {
        field: &'static str,
        source: Box<ValidateError>,
    },

    #[error("{label} at index {index}: {source}")]
    Item {
        label: &'static str,
        index: usize,
        source: Box<ValidateError>,
    },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Extension(#[from] ExtensionError),
}

impl ValidateError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    #[must_use]
    pub fn in_field(self, field: &'static str) -> Self {
        Self::Field {
            field,
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn at_index(self, label: &'static str, index: usize) -> Self {
        Self::Item {
            label,
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with field and item wrappers removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Field { source, .. } | Self::Item { source, .. } => source.root_cause(),
            other => other,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Field { source, .. } | Self::Item { source, .. } => source.kind(),
            Self::Invalid(_) => ErrorKind::Schema,
            Self::Choice(err) => err.kind(),
            Self::Extension(_) => ErrorKind::Extension,
        }
    }
}

///
/// Validate
///

pub trait Validate {
    fn validate(&self) -> Result<(), ValidateError>;
}

/// Validate one field, prefixing failures with its name.
pub fn field<T: Validate + ?Sized>(name: &'static str, value: &T) -> Result<(), ValidateError> {
    value.validate().map_err(|e| e.in_field(name))
}

/// Validate an optional field.
pub fn field_opt<T: Validate>(name: &'static str, value: Option<&T>) -> Result<(), ValidateError> {
    value.map_or(Ok(()), |value| field(name, value))
}

/// Validate every item of a collection, prefixing failures with its index.
pub fn items<'a, T, I>(label: &'static str, values: I) -> Result<(), ValidateError>
where
    T: Validate + 'a,
    I: IntoIterator<Item = &'a T>,
{
    values
        .into_iter()
        .enumerate()
        .try_for_each(|(index, value)| value.validate().map_err(|e| e.at_index(label, index)))
}

/// Reject an empty collection.
pub fn non_empty<T>(label: &'static str, values: &[T]) -> Result<(), ValidateError> {
    if values.is_empty() {
        return Err(ValidateError::invalid(format!("no {label}")));
    }

    Ok(())
}
