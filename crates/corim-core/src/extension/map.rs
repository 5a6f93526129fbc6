use crate::extension::{AttachError, Extensible, ExtensionPoint, Hook};
use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

/// Builds a fresh hook for one entity instance.
pub type HookFactory<E> = Arc<dyn Fn() -> Box<dyn Hook<E>> + Send + Sync>;

///
/// ExtensionMap
///
/// Hook factories keyed by extension point. Each point is bound to the
/// entity type that declares it, so a factory can only ever be attached
/// to the entity it was written for.
///

#[derive(Clone, Default)]
pub struct ExtensionMap {
    factories: BTreeMap<ExtensionPoint, Arc<dyn Any + Send + Sync>>,
}

impl ExtensionMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hook factory for entity `E`'s extension point.
    pub fn register<E, F>(&mut self, factory: F) -> Result<(), AttachError>
    where
        E: Extensible,
        F: Fn() -> Box<dyn Hook<E>> + Send + Sync + 'static,
    {
        self.register_at::<E, F>(E::POINT, factory)
    }

    /// Register a hook factory for entity `E` at one of the other points
    /// it declares.
    pub fn register_at<E, F>(&mut self, point: ExtensionPoint, factory: F) -> Result<(), AttachError>
    where
        E: Extensible,
        F: Fn() -> Box<dyn Hook<E>> + Send + Sync + 'static,
    {
        if !E::declares(point) {
            return Err(AttachError::UndeclaredPoint(point));
        }
        if self.factories.contains_key(&point) {
            return Err(AttachError::DuplicatePoint(point));
        }
        let factory: HookFactory<E> = Arc::new(factory);
        self.factories.insert(point, Arc::new(factory));

        Ok(())
    }

    /// Register a hook type built with `Default` for every instance.
    pub fn register_default<E, H>(&mut self) -> Result<(), AttachError>
    where
        E: Extensible,
        H: Hook<E> + Clone + Default + 'static,
    {
        self.register_default_at::<E, H>(E::POINT)
    }

    pub fn register_default_at<E, H>(&mut self, point: ExtensionPoint) -> Result<(), AttachError>
    where
        E: Extensible,
        H: Hook<E> + Clone + Default + 'static,
    {
        self.register_at::<E, _>(point, || Box::new(H::default()) as Box<dyn Hook<E>>)
    }

    /// Builder form of [`Self::register_default`].
    pub fn with_default<E, H>(mut self) -> Result<Self, AttachError>
    where
        E: Extensible,
        H: Hook<E> + Clone + Default + 'static,
    {
        self.register_default::<E, H>()?;

        Ok(self)
    }

    /// Builder form of [`Self::register_default_at`].
    pub fn with_default_at<E, H>(mut self, point: ExtensionPoint) -> Result<Self, AttachError>
    where
        E: Extensible,
        H: Hook<E> + Clone + Default + 'static,
    {
        self.register_default_at::<E, H>(point)?;

        Ok(self)
    }

    #[must_use]
    pub fn contains(&self, point: ExtensionPoint) -> bool {
        self.factories.contains_key(&point)
    }

    /// Registered points in name order.
    pub fn points(&self) -> impl Iterator<Item = ExtensionPoint> + '_ {
        self.factories.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build a fresh hook for entity `E`, if its point is covered.
    pub fn hook_for<E: Extensible>(&self) -> Result<Option<Box<dyn Hook<E>>>, AttachError> {
        self.hook_at::<E>(E::POINT)
    }

    /// Build a fresh hook for entity `E` from the factory at `point`.
    pub fn hook_at<E: Extensible>(&self, point: ExtensionPoint) -> Result<Option<Box<dyn Hook<E>>>, AttachError> {
        let Some(stored) = self.factories.get(&point) else {
            return Ok(None);
        };
        let stored: &(dyn Any + Send + Sync) = &**stored;
        let factory = stored
            .downcast_ref::<HookFactory<E>>()
            .ok_or(AttachError::HookTypeMismatch(point))?;

        Ok(Some(factory()))
    }

    /// Attach the hook for `E`'s point to `entity`. Uncovered points
    /// leave the entity hookless.
    pub fn attach<E: Extensible>(&self, entity: &mut E) -> Result<(), AttachError> {
        self.attach_at(E::POINT, entity)
    }

    pub fn attach_at<E: Extensible>(&self, point: ExtensionPoint, entity: &mut E) -> Result<(), AttachError> {
        match self.hook_at::<E>(point)? {
            Some(hook) => entity.extensions_mut().attach(hook),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ExtensionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

/// Point substitution for a subtree: an entity whose own point is the
/// first takes its hook from the second.
pub type Redirect = (ExtensionPoint, ExtensionPoint);

///
/// Hooks
///
/// An [`ExtensionMap`] seen from one position in a document. Records
/// reached through a redirect look their hooks up under the redirected
/// point; everything else uses its own point.
///

#[derive(Clone, Copy)]
pub struct Hooks<'a> {
    map: &'a ExtensionMap,
    redirects: &'static [Redirect],
}

impl<'a> Hooks<'a> {
    #[must_use]
    pub const fn new(map: &'a ExtensionMap) -> Self {
        Self { map, redirects: &[] }
    }

    #[must_use]
    pub const fn map(&self) -> &'a ExtensionMap {
        self.map
    }

    /// Replace the redirects in force.
    #[must_use]
    pub const fn redirect(mut self, redirects: &'static [Redirect]) -> Self {
        self.redirects = redirects;
        self
    }

    /// The point `E` takes its hook from at this position.
    #[must_use]
    pub fn point_of<E: Extensible>(&self) -> ExtensionPoint {
        self.redirects
            .iter()
            .find(|(from, _)| *from == E::POINT)
            .map_or(E::POINT, |(_, to)| *to)
    }

    pub fn attach<E: Extensible>(&self, entity: &mut E) -> Result<(), AttachError> {
        self.map.attach_at(self.point_of::<E>(), entity)
    }
}

impl<'a> From<&'a ExtensionMap> for Hooks<'a> {
    fn from(map: &'a ExtensionMap) -> Self {
        Self::new(map)
    }
}

impl fmt::Debug for Hooks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("map", self.map)
            .field("redirects", &self.redirects)
            .finish()
    }
}
