use crate::choice::{ChoiceError, ChoiceInput, ParseVariant, TypeChoice};
use std::{
    any::{Any, TypeId},
    collections::BTreeMap,
    fmt,
    sync::Arc,
};

/// Builds a family value from one input shape.
pub type Factory<T> = Arc<dyn Fn(ChoiceInput<'_>) -> Result<T, ChoiceError> + Send + Sync>;

///
/// Entry
///

struct Entry<T> {
    name: &'static str,
    factory: Factory<T>,
}

///
/// ChoiceRegistry
///
/// Name and tag index for one choice family. Names and tags are each
/// unique; a rejected registration leaves the registry unchanged.
///

pub struct ChoiceRegistry<T: TypeChoice> {
    by_tag: BTreeMap<u64, Entry<T>>,
    by_name: BTreeMap<&'static str, u64>,
}

impl<T: TypeChoice> ChoiceRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_tag: BTreeMap::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// Register `factory` under an explicit name and tag.
    ///
    /// The factory is asked for its sentinel value, which must report
    /// the same name and tag.
    pub fn register<F>(&mut self, type_name: &str, tag: u64, factory: F) -> Result<(), ChoiceError>
    where
        F: Fn(ChoiceInput<'_>) -> Result<T, ChoiceError> + Send + Sync + 'static,
    {
        let (name, learned_tag) = Self::describe(&factory)?;
        if name != type_name || learned_tag != tag {
            return Err(ChoiceError::InconsistentVariant {
                family: T::FAMILY,
                expected: format!("{type_name:?} ({tag})"),
                found: format!("{name:?} ({learned_tag})"),
            });
        }

        self.insert(name, tag, Arc::new(factory))
    }

    /// Register `factory` under `tag`, learning its name from the sentinel.
    pub fn register_factory<F>(&mut self, tag: u64, factory: F) -> Result<&'static str, ChoiceError>
    where
        F: Fn(ChoiceInput<'_>) -> Result<T, ChoiceError> + Send + Sync + 'static,
    {
        let (name, learned_tag) = Self::describe(&factory)?;
        if learned_tag != tag {
            return Err(ChoiceError::InconsistentVariant {
                family: T::FAMILY,
                expected: format!("{name:?} ({tag})"),
                found: format!("{name:?} ({learned_tag})"),
            });
        }
        self.insert(name, tag, Arc::new(factory))?;

        Ok(name)
    }

    /// Register a built-in variant that maps onto a closed enum arm.
    pub fn register_variant<V>(&mut self) -> Result<&'static str, ChoiceError>
    where
        V: ParseVariant,
        T: From<V>,
    {
        let sentinel = V::default();
        self.register_factory(sentinel.tag(), |input| V::from_input(input).map(T::from))
    }

    /// Register a third-party variant carried in the family's extension arm.
    pub fn register_extension<V>(&mut self) -> Result<&'static str, ChoiceError>
    where
        V: ParseVariant + Clone + PartialEq + 'static,
    {
        let sentinel = V::default();
        self.register_factory(sentinel.tag(), |input| {
            V::from_input(input).map(|v| T::from_extension(Box::new(v)))
        })
    }

    /// Remove a variant by name. Only meant for test isolation.
    pub fn unregister(&mut self, type_name: &str) -> bool {
        let Some(tag) = self.by_name.remove(type_name) else {
            return false;
        };
        self.by_tag.remove(&tag);
        tracing::debug!(family = T::FAMILY, type_name, tag, "unregistered choice variant");

        true
    }

    /// Build a value from its text-form discriminator.
    pub fn resolve_by_name(&self, type_name: &str, input: ChoiceInput<'_>) -> Result<T, ChoiceError> {
        let tag = self
            .by_name
            .get(type_name)
            .ok_or_else(|| ChoiceError::UnknownTypeName {
                family: T::FAMILY,
                name: type_name.to_string(),
            })?;

        self.resolve_by_tag(*tag, input)
    }

    /// Build a value from its binary-form discriminator.
    pub fn resolve_by_tag(&self, tag: u64, input: ChoiceInput<'_>) -> Result<T, ChoiceError> {
        let entry = self.by_tag.get(&tag).ok_or(ChoiceError::UnknownTag {
            family: T::FAMILY,
            tag,
        })?;

        (entry.factory)(input)
    }

    #[must_use]
    pub fn contains_name(&self, type_name: &str) -> bool {
        self.by_name.contains_key(type_name)
    }

    #[must_use]
    pub fn contains_tag(&self, tag: u64) -> bool {
        self.by_tag.contains_key(&tag)
    }

    /// Registered `(name, tag)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.by_tag.iter().map(|(tag, entry)| (entry.name, *tag))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    fn describe<F>(factory: &F) -> Result<(&'static str, u64), ChoiceError>
    where
        F: Fn(ChoiceInput<'_>) -> Result<T, ChoiceError>,
    {
        let sentinel = factory(ChoiceInput::Empty)?;

        Ok((sentinel.type_name(), sentinel.tag()))
    }

    fn insert(&mut self, name: &'static str, tag: u64, factory: Factory<T>) -> Result<(), ChoiceError> {
        if self.by_name.contains_key(name) {
            return Err(ChoiceError::DuplicateName {
                family: T::FAMILY,
                name: name.to_string(),
            });
        }
        if self.by_tag.contains_key(&tag) {
            return Err(ChoiceError::DuplicateTag {
                family: T::FAMILY,
                tag,
            });
        }

        self.by_name.insert(name, tag);
        self.by_tag.insert(tag, Entry { name, factory });
        tracing::debug!(family = T::FAMILY, type_name = name, tag, "registered choice variant");

        Ok(())
    }
}

impl<T: TypeChoice> Default for ChoiceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TypeChoice> fmt::Debug for ChoiceRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceRegistry")
            .field("family", &T::FAMILY)
            .field("variants", &self.by_name)
            .finish()
    }
}

///
/// Registries
///
/// One registry per choice family, keyed by the family type. Populated
/// at startup and handed to the codec by reference.
///

#[derive(Default)]
pub struct Registries {
    families: BTreeMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Registries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the registry for family `T`.
    pub fn family<T: TypeChoice>(&self) -> Result<&ChoiceRegistry<T>, ChoiceError> {
        self.families
            .get(&TypeId::of::<T>())
            .and_then(|slot| {
                let slot: &(dyn Any + Send + Sync) = &**slot;
                slot.downcast_ref::<ChoiceRegistry<T>>()
            })
            .ok_or(ChoiceError::UnregisteredFamily { family: T::FAMILY })
    }

    /// Borrow the registry for family `T` mutably, creating it if absent.
    pub fn family_mut<T: TypeChoice>(&mut self) -> Result<&mut ChoiceRegistry<T>, ChoiceError> {
        let slot = self
            .families
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ChoiceRegistry::<T>::new()));
        let slot: &mut (dyn Any + Send + Sync) = &mut **slot;

        slot.downcast_mut::<ChoiceRegistry<T>>()
            .ok_or(ChoiceError::UnregisteredFamily { family: T::FAMILY })
    }
}

impl fmt::Debug for Registries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registries")
            .field("families", &self.families.len())
            .finish()
    }
}
