use crate::{
    codec::{CodecError, Context, FieldValue, Format, Record},
    model::{FieldSpec, Layout},
};
use std::collections::BTreeMap;

///
/// FieldWriter
///
/// Collects the encoded fields of one record, including fields written
/// by embedded sub-records and extension hooks. Optional fields holding
/// an empty value are skipped; a key written twice is a programming
/// error in the schema.
///

pub struct FieldWriter<F: Format> {
    entity: &'static str,
    entries: Vec<(&'static FieldSpec, F::Value)>,
}

impl<F: Format> FieldWriter<F> {
    #[must_use]
    pub(crate) const fn new(entity: &'static str) -> Self {
        Self {
            entity,
            entries: Vec::new(),
        }
    }

    /// Write one field.
    pub fn put<T: FieldValue>(
        &mut self,
        field: &'static FieldSpec,
        value: &T,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        if field.optional && value.is_empty() {
            return Ok(());
        }
        let encoded = value.encode::<F>(cx).map_err(|e| e.in_field(field.name))?;

        self.insert(field, encoded)
    }

    /// Write an optional field; `None` is omitted.
    pub fn put_opt<T: FieldValue>(
        &mut self,
        field: &'static FieldSpec,
        value: Option<&T>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        match value {
            Some(value) => self.put(field, value, cx),
            None => Ok(()),
        }
    }

    /// Flatten an embedded sub-record into this map.
    pub fn embed<R: Record>(&mut self, record: &R, cx: &Context<'_>) -> Result<(), CodecError> {
        record.encode_fields(self, cx)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn finish(self, layout: Layout) -> F::Value {
        F::assemble(layout, self.entries)
    }

    fn insert(&mut self, field: &'static FieldSpec, value: F::Value) -> Result<(), CodecError> {
        let taken = self
            .entries
            .iter()
            .any(|(existing, _)| existing.key == field.key || existing.name == field.name);
        if taken {
            return Err(CodecError::KeyCollision {
                entity: self.entity,
                field: field.name,
                key: field.key,
            });
        }
        self.entries.push((field, value));

        Ok(())
    }
}

///
/// RawMap
///
/// Working set of undecoded entries for one record. Fields are removed
/// as they are claimed; whatever is left after the record and its hooks
/// have run is unknown data.
///

pub struct RawMap<F: Format> {
    entity: &'static str,
    entries: BTreeMap<F::Key, F::Value>,
}

impl<F: Format> RawMap<F> {
    pub(crate) fn new(entity: &'static str, entries: Vec<(F::Key, F::Value)>) -> Self {
        Self {
            entity,
            entries: entries.into_iter().collect(),
        }
    }

    /// Claim a mandatory field.
    pub fn take<T: FieldValue>(
        &mut self,
        field: &'static FieldSpec,
        cx: &Context<'_>,
    ) -> Result<T, CodecError> {
        self.take_opt(field, cx)?.ok_or(CodecError::MissingField {
            entity: self.entity,
            field: field.name,
            key: field.key,
        })
    }

    /// Claim an optional field.
    pub fn take_opt<T: FieldValue>(
        &mut self,
        field: &'static FieldSpec,
        cx: &Context<'_>,
    ) -> Result<Option<T>, CodecError> {
        self.entries
            .remove(&F::key_of(field))
            .map(|value| T::decode::<F>(value, cx).map_err(|e| e.in_field(field.name)))
            .transpose()
    }

    /// Claim an optional field, falling back to the type's default.
    pub fn take_or_default<T: FieldValue + Default>(
        &mut self,
        field: &'static FieldSpec,
        cx: &Context<'_>,
    ) -> Result<T, CodecError> {
        Ok(self.take_opt(field, cx)?.unwrap_or_default())
    }

    /// Decode an embedded sub-record from this same map.
    pub fn embed<R: Record>(&mut self, record: &mut R, cx: &Context<'_>) -> Result<(), CodecError> {
        record.decode_fields(self, cx)
    }

    #[must_use]
    pub fn contains(&self, field: &FieldSpec) -> bool {
        self.entries.contains_key(&F::key_of(field))
    }

    /// Keys not yet claimed.
    pub fn remaining(&self) -> impl Iterator<Item = &F::Key> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject any entry nobody claimed.
    pub(crate) fn finish(self) -> Result<(), CodecError> {
        if self.entries.is_empty() {
            return Ok(());
        }
        let keys = self
            .entries
            .keys()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        Err(CodecError::UnknownFields {
            entity: self.entity,
            keys,
        })
    }
}
