use crate::{
    corim::ProfileId,
    profile::{Profile, ProfileError, Root},
};
use corim_core::{
    codec::Record,
    extension::{AttachError, ExtensionMap},
};
use std::collections::BTreeMap;

///
/// ProfileRegistry
///
/// Profiles keyed by the text form of their id. Registration either
/// succeeds whole or leaves the registry untouched.
///

#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    pub fn register_profile(&mut self, id: ProfileId, extensions: ExtensionMap) -> Result<(), ProfileError> {
        let key = id.to_string();
        if self.profiles.contains_key(&key) {
            return Err(ProfileError::DuplicateProfile { id: key });
        }
        let profile = Profile::new(id, extensions)?;

        tracing::debug!(
            profile = %key,
            points = ?profile.extensions().points().map(|p| p.as_str()).collect::<Vec<_>>(),
            "registered profile"
        );
        self.profiles.insert(key, profile);

        Ok(())
    }

    /// Remove a profile. Only meant for test isolation.
    pub fn unregister_profile(&mut self, id: &ProfileId) -> bool {
        let key = id.to_string();
        let removed = self.profiles.remove(&key).is_some();
        if removed {
            tracing::debug!(profile = %key, "unregistered profile");
        }

        removed
    }

    pub fn get_profile(&self, id: &ProfileId) -> Result<&Profile, ProfileError> {
        let key = id.to_string();

        self.profiles
            .get(&key)
            .ok_or(ProfileError::NotFound { id: key })
    }

    #[must_use]
    pub fn contains(&self, id: &ProfileId) -> bool {
        self.profiles.contains_key(&id.to_string())
    }

    /// Profiles in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile for an optional id. Absent and unknown ids both yield
    /// `None`; rejecting unknown profiles is left to the caller.
    #[must_use]
    pub fn lookup(&self, id: Option<&ProfileId>) -> Option<&Profile> {
        id.and_then(|id| self.profiles.get(&id.to_string()))
    }

    /// Build a fresh root with the profile's hooks attached and, for
    /// roots that carry one, the profile id set. An absent or unknown id
    /// yields an unextended root.
    pub fn build_root<R: Root>(&self, id: Option<&ProfileId>) -> Result<R, AttachError> {
        let mut root = R::default();
        match (id, self.lookup(id)) {
            (_, Some(profile)) => {
                root.attach_extensions(profile.hooks())?;
                root.set_profile(profile.id());
                tracing::debug!(root = %R::KIND, profile = %profile.id(), "built root for profile");
            }
            (Some(id), None) => {
                tracing::debug!(root = %R::KIND, profile = %id, "unknown profile, building unextended root");
            }
            (None, None) => {}
        }

        Ok(root)
    }
}
