use std::fmt;

///
/// ErrorKind
///
/// Stable classification shared by every error in the workspace.
/// Callers match on this instead of message text.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorKind {
    /// Missing mandatory field, duplicate or unknown key, wrong shape.
    Schema,
    /// Unknown or missing type name or tag.
    Discriminator,
    /// Duplicate name, tag, profile id or hook at registration time.
    RegistryConflict,
    /// Failure reported by an attached extension hook.
    Extension,
    /// Malformed variant payload (bad base64, bad OID, wrong length).
    VariantParse,
    /// Backend encode/decode failure.
    Serialize,
    /// Invalid configuration.
    Config,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Discriminator => "discriminator",
            Self::RegistryConflict => "registry_conflict",
            Self::Extension => "extension",
            Self::VariantParse => "variant_parse",
            Self::Serialize => "serialize",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
