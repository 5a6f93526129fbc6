use derive_more::{Display, From};

///
/// Flag
///
/// Identifier in the open integer space of measurement flags.
///

#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct Flag(pub i64);

///
/// FlagStore
///
/// Boolean flags an extension adds to a closed flags structure. A store
/// ignores flags it does not own.
///

pub trait FlagStore: Send + Sync {
    /// Whether any owned flag holds a value.
    fn any_set(&self) -> bool;

    fn set_true(&mut self, flag: Flag);

    fn set_false(&mut self, flag: Flag);

    fn clear(&mut self, flag: Flag);

    /// `None` when the flag is unset or not owned by this store.
    fn get(&self, flag: Flag) -> Option<bool>;
}
