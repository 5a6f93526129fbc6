use crate::{
    choice::Registries,
    codec::{CodecError, Context, FieldWriter, Format, Json, RawMap},
    extension::{AttachError, ExtensionError, Extensible, Flag, FlagStore, Hook},
    model::Layout,
};
use serde_json::Value as JsonValue;
use std::{any::Any, fmt};

///
/// ExtensionSlot
///
/// Zero or one hook owned by an entity. Once attached the hook stays for
/// the life of the entity. With nothing attached, or with a hook lacking
/// the requested capability, every operation is a no-op.
///
/// Two slots compare equal when both are empty, or when both hold a hook
/// of the same type writing the same extra fields.
///

pub struct ExtensionSlot<E: 'static> {
    hook: Option<Box<dyn Hook<E>>>,
}

impl<E: Extensible> ExtensionSlot<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self { hook: None }
    }

    /// Attach a hook. Fails if one is already attached.
    pub fn attach(&mut self, hook: Box<dyn Hook<E>>) -> Result<(), AttachError> {
        if self.hook.is_some() {
            return Err(AttachError::AlreadyAttached(E::POINT));
        }
        self.hook = Some(hook);

        Ok(())
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.hook.is_some()
    }

    /// Borrow the attached hook as its concrete type.
    #[must_use]
    pub fn hook<H: 'static>(&self) -> Option<&H> {
        self.hook
            .as_deref()
            .and_then(|hook| hook.as_any().downcast_ref::<H>())
    }

    pub fn hook_mut<H: 'static>(&mut self) -> Option<&mut H> {
        self.hook
            .as_deref_mut()
            .and_then(|hook| hook.as_any_mut().downcast_mut::<H>())
    }

    /// Run the hook's constraint against `entity`.
    pub fn validate(&self, entity: &E) -> Result<(), ExtensionError> {
        match self.hook.as_deref().and_then(|hook| hook.constraint()) {
            Some(constraint) => constraint.validate(entity),
            None => Ok(()),
        }
    }

    /// Write the hook's extra fields.
    pub fn encode_fields<F: Format>(
        &self,
        out: &mut FieldWriter<F>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        match self.hook.as_deref().and_then(|hook| hook.fields()) {
            Some(fields) => F::encode_extension(fields, out, cx),
            None => Ok(()),
        }
    }

    /// Let the hook claim its extra fields.
    pub fn decode_fields<F: Format>(
        &mut self,
        raw: &mut RawMap<F>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        match self.hook.as_deref_mut().and_then(|hook| hook.fields_mut()) {
            Some(fields) => F::decode_extension(fields, raw, cx),
            None => Ok(()),
        }
    }

    /// Whether the hook holds at least one extra field value. Hooks
    /// without the fields capability hold none.
    #[must_use]
    pub fn has_field_values(&self) -> bool {
        match self.hook.as_deref().map(field_values) {
            Some(Ok(Some(JsonValue::Object(map)))) => !map.is_empty(),
            Some(Err(_)) => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn flags(&self) -> Option<&dyn FlagStore> {
        self.hook.as_deref().and_then(|hook| hook.flags())
    }

    pub fn flags_mut(&mut self) -> Option<&mut dyn FlagStore> {
        self.hook.as_deref_mut().and_then(|hook| hook.flags_mut())
    }

    #[must_use]
    pub fn any_flag_set(&self) -> bool {
        self.flags().is_some_and(|store| store.any_set())
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if let Some(store) = self.flags_mut() {
            if value {
                store.set_true(flag);
            } else {
                store.set_false(flag);
            }
        }
    }

    pub fn clear_flag(&mut self, flag: Flag) {
        if let Some(store) = self.flags_mut() {
            store.clear(flag);
        }
    }

    #[must_use]
    pub fn get_flag(&self, flag: Flag) -> Option<bool> {
        self.flags().and_then(|store| store.get(flag))
    }
}

impl<E: Extensible> Default for ExtensionSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Clone for ExtensionSlot<E> {
    fn clone(&self) -> Self {
        Self {
            hook: self.hook.as_ref().map(|hook| (**hook).clone_box()),
        }
    }
}

impl<E: 'static> PartialEq for ExtensionSlot<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self.hook.as_deref(), other.hook.as_deref()) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                Any::type_id(a.as_any()) == Any::type_id(b.as_any())
                    && matches!((field_values(a), field_values(b)), (Ok(left), Ok(right)) if left == right)
            }
            _ => false,
        }
    }
}

// Text form of a hook's extra fields. Field values never consult the
// choice registries on encode, so an empty set is enough.
fn field_values<E: 'static>(hook: &dyn Hook<E>) -> Result<Option<JsonValue>, CodecError> {
    let Some(fields) = hook.fields() else {
        return Ok(None);
    };
    let registries = Registries::new();
    let cx = Context::new(&registries);
    let mut out = FieldWriter::<Json>::new("extension");
    fields.encode_json(&mut out, &cx)?;

    Ok(Some(out.finish(Layout::Map)))
}

impl<E: 'static> fmt::Debug for ExtensionSlot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.hook.is_some() { "attached" } else { "empty" };
        f.debug_tuple("ExtensionSlot").field(&state).finish()
    }
}
