//! Type-erased failures and their exact-type identity.

use std::any::{Any, TypeId};
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of one concrete failure type.
///
/// Keys compare by `TypeId` only. A wrapper error and the error it wraps
/// produce different keys, so classification never looks through wrappers.
#[derive(Clone, Copy)]
pub struct FaultKey {
    id: TypeId,
    name: &'static str,
}

impl FaultKey {
    /// Key for the concrete type `E`.
    pub fn of<E: 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: short_type_name(std::any::type_name::<E>()),
        }
    }

    /// Short display name of the type (`InvalidArgument`, not the full path).
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for FaultKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FaultKey {}

impl Hash for FaultKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for FaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaultKey({})", self.name)
    }
}

impl fmt::Display for FaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path and any generic arguments from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

trait ErasedFault: StdError + Send + Sync + 'static {
    fn key(&self) -> FaultKey;
    fn as_any(&self) -> &dyn Any;
    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static>;
}

impl<E> ErasedFault for E
where
    E: StdError + Send + Sync + 'static,
{
    fn key(&self) -> FaultKey {
        FaultKey::of::<E>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }
}

/// A failure raised by a downstream handler.
///
/// Carries the original error untouched along with the identity of its
/// concrete type. Propagated failures are the same value the handler raised.
pub struct Failure {
    inner: Box<dyn ErasedFault>,
}

impl Failure {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(error),
        }
    }

    /// Exact-type identity of the wrapped error.
    pub fn key(&self) -> FaultKey {
        self.inner.key()
    }

    pub fn display_name(&self) -> &'static str {
        self.key().name()
    }

    /// The error's own message.
    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// Message of the underlying cause, if the error has one.
    pub fn inner_message(&self) -> Option<String> {
        self.inner.source().map(ToString::to_string)
    }

    pub fn is<E: 'static>(&self) -> bool {
        self.inner.as_any().is::<E>()
    }

    pub fn downcast_ref<E: 'static>(&self) -> Option<&E> {
        self.inner.as_any().downcast_ref::<E>()
    }

    /// Hand the original error back as a boxed error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.inner.into_error()
    }
}

impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
