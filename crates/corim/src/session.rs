use crate::{
    Error, builtins,
    comid::Comid,
    corim::{ProfileId, UnsignedCorim},
    profile::{Profile, ProfileRegistry, Root},
};
use corim_core::{
    choice::Registries,
    codec::{self, Cbor, CodecError, Context, Format, Json, Record},
    config::CodecConfig,
    extension::ExtensionMap,
    validate::Validate,
};

///
/// Session
///
/// Owns the choice registries, the profile registry and the codec
/// config. Register extensions first, then share the session read-only
/// across decoders.
///

#[derive(Debug)]
pub struct Session {
    config: CodecConfig,
    choices: Registries,
    profiles: ProfileRegistry,
}

impl Session {
    /// New session with every built-in variant registered.
    pub fn new(config: CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            config,
            choices: builtins::registries()?,
            profiles: ProfileRegistry::new(),
        })
    }

    /// New session configured from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Self::new(CodecConfig::from_toml_str(text)?)
    }

    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    #[must_use]
    pub const fn choices(&self) -> &Registries {
        &self.choices
    }

    pub const fn choices_mut(&mut self) -> &mut Registries {
        &mut self.choices
    }

    #[must_use]
    pub const fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    pub const fn profiles_mut(&mut self) -> &mut ProfileRegistry {
        &mut self.profiles
    }

    pub fn register_profile(&mut self, id: ProfileId, extensions: ExtensionMap) -> Result<(), Error> {
        self.profiles.register_profile(id, extensions).map_err(Error::from)
    }

    /// Codec context with the hooks of `profile`, if it is registered.
    #[must_use]
    pub fn context(&self, profile: Option<&ProfileId>) -> Context<'_> {
        Context::new(&self.choices).with_extensions(self.profiles.lookup(profile).map(Profile::extensions))
    }

    //
    // CoMID
    //

    pub fn encode_comid_cbor(&self, comid: &Comid) -> Result<Vec<u8>, Error> {
        self.encode::<Cbor, _>(comid)
    }

    pub fn encode_comid_json(&self, comid: &Comid) -> Result<Vec<u8>, Error> {
        self.encode::<Json, _>(comid)
    }

    /// Decode a CoMID with the hooks of `profile`.
    pub fn decode_comid_cbor(&self, bytes: &[u8], profile: Option<&ProfileId>) -> Result<Comid, Error> {
        self.decode_root::<Cbor, _>(bytes, profile)
    }

    pub fn decode_comid_json(&self, bytes: &[u8], profile: Option<&ProfileId>) -> Result<Comid, Error> {
        self.decode_root::<Json, _>(bytes, profile)
    }

    //
    // Unsigned CoRIM
    //

    pub fn encode_unsigned_corim_cbor(&self, corim: &UnsignedCorim) -> Result<Vec<u8>, Error> {
        self.encode::<Cbor, _>(corim)
    }

    pub fn encode_unsigned_corim_json(&self, corim: &UnsignedCorim) -> Result<Vec<u8>, Error> {
        self.encode::<Json, _>(corim)
    }

    /// Decode a manifest with the hooks of the profile it declares.
    pub fn decode_unsigned_corim_cbor(&self, bytes: &[u8]) -> Result<UnsignedCorim, Error> {
        self.decode_manifest::<Cbor>(bytes)
    }

    pub fn decode_unsigned_corim_json(&self, bytes: &[u8]) -> Result<UnsignedCorim, Error> {
        self.decode_manifest::<Json>(bytes)
    }

    //
    // internals
    //

    fn encode<F: Format, R: Record + Validate>(&self, record: &R) -> Result<Vec<u8>, Error> {
        record.validate()?;

        let cx = Context::new(&self.choices);
        Ok(codec::to_bytes::<F, R>(record, &cx, &self.config)?)
    }

    fn decode_root<F: Format, R: Root>(&self, bytes: &[u8], profile: Option<&ProfileId>) -> Result<R, Error> {
        let mut root = self.profiles.build_root::<R>(profile)?;
        let cx = self.context(profile);
        codec::from_bytes_into::<F, R>(&mut root, bytes, &cx, &self.config)?;

        Ok(root)
    }

    // The profile decides which hooks exist, so it is read before the
    // rest of the manifest is decoded.
    fn decode_manifest<F: Format>(&self, bytes: &[u8]) -> Result<UnsignedCorim, Error> {
        let value = F::deserialize(bytes, &self.config).map_err(CodecError::from)?;
        let profile = UnsignedCorim::peek_profile::<F>(&value, &Context::new(&self.choices))?;

        let mut corim = self.profiles.build_root::<UnsignedCorim>(profile.as_ref())?;
        let cx = self.context(profile.as_ref());
        codec::decode_into::<F, UnsignedCorim>(&mut corim, value, &cx)?;

        Ok(corim)
    }
}
