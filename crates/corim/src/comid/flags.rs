use crate::points;
use corim_core::{
    extension::{AttachError, Hooks},
    prelude::*,
};

static FLAG_FIELDS: [FieldSpec; 10] = [
    FieldSpec::optional("is-configured", 0),
    FieldSpec::optional("is-secure", 1),
    FieldSpec::optional("is-recovery", 2),
    FieldSpec::optional("is-debug", 3),
    FieldSpec::optional("is-replay-protected", 4),
    FieldSpec::optional("is-integrity-protected", 5),
    FieldSpec::optional("is-runtime-meas", 6),
    FieldSpec::optional("is-immutable", 7),
    FieldSpec::optional("is-tcb", 8),
    FieldSpec::optional("is-confidentiality-protected", 9),
];

static FLAGS_SCHEMA: EntitySchema = EntitySchema {
    entity: "flags",
    layout: Layout::Map,
    fields: &FLAG_FIELDS,
    embedded: &[],
};

///
/// FlagsMap
///
/// Operational flags of an environment. The ten built-in flags are
/// plain fields; any other flag is handed to the flags hook of the
/// enclosing value (reference or endorsed) and silently dropped when no
/// hook stores it.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlagsMap {
    pub is_configured: Option<bool>,
    pub is_secure: Option<bool>,
    pub is_recovery: Option<bool>,
    pub is_debug: Option<bool>,
    pub is_replay_protected: Option<bool>,
    pub is_integrity_protected: Option<bool>,
    pub is_runtime_meas: Option<bool>,
    pub is_immutable: Option<bool>,
    pub is_tcb: Option<bool>,
    pub is_confidentiality_protected: Option<bool>,
    pub extensions: ExtensionSlot<Self>,
}

impl FlagsMap {
    pub const IS_CONFIGURED: Flag = Flag(0);
    pub const IS_SECURE: Flag = Flag(1);
    pub const IS_RECOVERY: Flag = Flag(2);
    pub const IS_DEBUG: Flag = Flag(3);
    pub const IS_REPLAY_PROTECTED: Flag = Flag(4);
    pub const IS_INTEGRITY_PROTECTED: Flag = Flag(5);
    pub const IS_RUNTIME_MEAS: Flag = Flag(6);
    pub const IS_IMMUTABLE: Flag = Flag(7);
    pub const IS_TCB: Flag = Flag(8);
    pub const IS_CONFIDENTIALITY_PROTECTED: Flag = Flag(9);

    #[must_use]
    pub fn with(mut self, flag: Flag, value: bool) -> Self {
        self.set(flag, value);
        self
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        match self.builtin_mut(flag) {
            Some(slot) => *slot = Some(value),
            None => self.extensions.set_flag(flag, value),
        }
    }

    const fn builtin(&self) -> [Option<bool>; 10] {
        [
            self.is_configured,
            self.is_secure,
            self.is_recovery,
            self.is_debug,
            self.is_replay_protected,
            self.is_integrity_protected,
            self.is_runtime_meas,
            self.is_immutable,
            self.is_tcb,
            self.is_confidentiality_protected,
        ]
    }

    const fn builtin_slots(&mut self) -> [&mut Option<bool>; 10] {
        [
            &mut self.is_configured,
            &mut self.is_secure,
            &mut self.is_recovery,
            &mut self.is_debug,
            &mut self.is_replay_protected,
            &mut self.is_integrity_protected,
            &mut self.is_runtime_meas,
            &mut self.is_immutable,
            &mut self.is_tcb,
            &mut self.is_confidentiality_protected,
        ]
    }

    fn builtin_mut(&mut self, flag: Flag) -> Option<&mut Option<bool>> {
        let index = usize::try_from(flag.0).ok()?;

        self.builtin_slots().into_iter().nth(index)
    }
}

impl FlagStore for FlagsMap {
    fn any_set(&self) -> bool {
        self.builtin().iter().any(Option::is_some) || self.extensions.any_flag_set()
    }

    fn set_true(&mut self, flag: Flag) {
        self.set(flag, true);
    }

    fn set_false(&mut self, flag: Flag) {
        self.set(flag, false);
    }

    fn clear(&mut self, flag: Flag) {
        match self.builtin_mut(flag) {
            Some(slot) => *slot = None,
            None => self.extensions.clear_flag(flag),
        }
    }

    fn get(&self, flag: Flag) -> Option<bool> {
        match usize::try_from(flag.0).ok().filter(|index| *index < FLAG_FIELDS.len()) {
            Some(index) => self.builtin()[index],
            None => self.extensions.get_flag(flag),
        }
    }
}

impl Extensible for FlagsMap {
    const POINT: ExtensionPoint = points::COMID_REFERENCE_VALUE_FLAGS;

    fn declares(point: ExtensionPoint) -> bool {
        point == points::COMID_REFERENCE_VALUE_FLAGS || point == points::COMID_ENDORSED_VALUE_FLAGS
    }

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Record for FlagsMap {
    fn schema() -> &'static EntitySchema {
        &FLAGS_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        for (field, value) in FLAG_FIELDS.iter().zip(self.builtin()) {
            out.put_opt(field, value.as_ref(), cx)?;
        }

        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        for (field, slot) in FLAG_FIELDS.iter().zip(self.builtin_slots()) {
            *slot = raw.take_opt(field, cx)?;
        }

        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        hooks.attach(self)
    }
}

corim_core::record_field!(FlagsMap);

impl Validate for FlagsMap {
    fn validate(&self) -> Result<(), ValidateError> {
        self.validate_extensions().map_err(Into::into)
    }
}
