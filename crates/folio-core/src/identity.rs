//! Identity-based equality and hashing.
//!
//! Every entity type declares an ordered list of identity fields. Two
//! entities are equal when they share a concrete type and every identity
//! field compares equal:
//!
//! - scalars and text by value (text is case-sensitive),
//! - nested entities recursively, including their concrete type,
//! - collections as multisets, ignoring order.
//!
//! Two absent values are equal; absent and present never are. The hash code
//! folds each field's hash into a running accumulator in declaration order,
//! and combines collection elements commutatively so it agrees with the
//! order-insensitive equality.

use std::any::TypeId;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

/// A comparable projection of one identity field.
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Text(&'a str),
    Bytes(&'a [u8]),
    Instant(DateTime<Utc>),
    Entity(&'a dyn DynIdentity),
    Set(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    /// Projects an optional nested entity.
    pub fn entity<T: Identity>(value: Option<&'a T>) -> Self {
        match value {
            Some(entity) => Self::Entity(entity),
            None => Self::Null,
        }
    }

    /// Projects a collection of nested entities.
    pub fn entities<T, I>(items: I) -> Self
    where
        T: Identity,
        I: IntoIterator<Item = &'a T>,
    {
        Self::Set(items.into_iter().map(|item| Self::Entity(item)).collect())
    }

    /// Projects a collection of text values.
    pub fn texts<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::Set(items.into_iter().map(Self::Text).collect())
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(Self::Null, Self::Text)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Int(n) => write!(f, "Int({n})"),
            Self::Text(s) => write!(f, "Text({s:?})"),
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Self::Instant(t) => write!(f, "Instant({t})"),
            Self::Entity(e) => write!(f, "Entity({})", e.type_name()),
            Self::Set(items) => f.debug_list().entries(items).finish(),
        }
    }
}

/// A named identity field.
#[derive(Debug)]
pub struct IdentityField<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
}

impl<'a> IdentityField<'a> {
    pub fn new(name: &'static str, value: impl Into<FieldValue<'a>>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Declares the ordered identity fields of an entity type.
pub trait Identity: 'static {
    /// Returns the identity fields in declaration order. The set of names
    /// is fixed per type; only the values vary.
    fn identity(&self) -> Vec<IdentityField<'_>>;
}

/// Type-erased view of an [`Identity`], used for nested entity fields and
/// for comparing entities whose concrete types may differ.
pub trait DynIdentity {
    fn concrete_type(&self) -> TypeId;
    fn type_name(&self) -> &'static str;
    fn identity_fields(&self) -> Vec<IdentityField<'_>>;
}

impl<T: Identity> DynIdentity for T {
    fn concrete_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn identity_fields(&self) -> Vec<IdentityField<'_>> {
        self.identity()
    }
}

/// Compares two entities of the same static type.
pub fn equals<T: Identity>(a: &T, b: &T) -> bool {
    fields_equal(&a.identity(), &b.identity())
}

/// Compares two entities of possibly different concrete types. Entities of
/// different types are never equal, whatever their field values.
pub fn equals_dyn(a: &dyn DynIdentity, b: &dyn DynIdentity) -> bool {
    a.concrete_type() == b.concrete_type()
        && fields_equal(&a.identity_fields(), &b.identity_fields())
}

/// Computes the identity hash code of an entity.
pub fn hash_code<T: Identity>(entity: &T) -> u64 {
    hash_fields(&entity.identity())
}

fn fields_equal(a: &[IdentityField<'_>], b: &[IdentityField<'_>]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.name == y.name && values_equal(&x.value, &y.value))
}

fn values_equal(a: &FieldValue<'_>, b: &FieldValue<'_>) -> bool {
    match (a, b) {
        (FieldValue::Null, FieldValue::Null) => true,
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x == y,
        (FieldValue::Int(x), FieldValue::Int(y)) => x == y,
        (FieldValue::Text(x), FieldValue::Text(y)) => x == y,
        (FieldValue::Bytes(x), FieldValue::Bytes(y)) => x == y,
        (FieldValue::Instant(x), FieldValue::Instant(y)) => x == y,
        (FieldValue::Entity(x), FieldValue::Entity(y)) => equals_dyn(*x, *y),
        (FieldValue::Set(x), FieldValue::Set(y)) => multiset_equal(x, y),
        _ => false,
    }
}

fn multiset_equal(a: &[FieldValue<'_>], b: &[FieldValue<'_>]) -> bool {
    let count = |items: &[FieldValue<'_>], needle: &FieldValue<'_>| {
        items.iter().filter(|item| values_equal(item, needle)).count()
    };
    a.len() == b.len() && a.iter().all(|item| count(a, item) == count(b, item))
}

fn hash_fields(fields: &[IdentityField<'_>]) -> u64 {
    fields
        .iter()
        .fold(17_u64, |acc, field| acc.wrapping_mul(31) ^ hash_value(&field.value))
}

fn hash_value(value: &FieldValue<'_>) -> u64 {
    match value {
        FieldValue::Null => 0,
        FieldValue::Bool(b) => hash_of(b),
        FieldValue::Int(n) => hash_of(n),
        FieldValue::Text(s) => hash_of(s),
        FieldValue::Bytes(b) => hash_of(b),
        FieldValue::Instant(t) => hash_of(t),
        FieldValue::Entity(e) => hash_fields(&e.identity_fields()),
        FieldValue::Set(items) => items.iter().map(hash_value).fold(0, u64::wrapping_add),
    }
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Implements `PartialEq`, `Eq` and `Hash` for entity types through their
/// [`Identity`] declaration.
#[macro_export]
macro_rules! identity_traits {
    ($($ty:ty),+ $(,)?) => {$(
        impl ::core::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::identity::equals(self, other)
            }
        }

        impl ::core::cmp::Eq for $ty {}

        impl ::core::hash::Hash for $ty {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                state.write_u64($crate::identity::hash_code(self));
            }
        }
    )+};
}
