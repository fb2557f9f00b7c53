//! Identity contract for registrable entities.

/// Something a registry keys by a typed id.
///
/// Identity is the id alone: two values with the same id are the same
/// entity even when their permitted mutable fields differ, which is what
/// makes replacing a row after a rename safe.
pub trait Entity {
    /// Typed identifier: copyable, hashable, printable in registry errors.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> Self::Id;
}
