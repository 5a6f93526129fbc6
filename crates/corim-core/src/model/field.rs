///
/// FieldSpec
/// One field of an entity schema.
///
/// `key` is the small non-negative integer used by the binary form and
/// `name` is the member name used by the text form. Both are fixed per
/// entity and never configurable.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    /// Text-form member name; also used in diagnostics.
    pub name: &'static str,
    /// Binary-form map key.
    pub key: u64,
    /// Optional fields are omitted when empty and may be absent on decode.
    pub optional: bool,
}

impl FieldSpec {
    #[must_use]
    pub const fn required(name: &'static str, key: u64) -> Self {
        Self {
            name,
            key,
            optional: false,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, key: u64) -> Self {
        Self {
            name,
            key,
            optional: true,
        }
    }
}
