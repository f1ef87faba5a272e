//! Self-referential category trees.
//!
//! A [`Category`] belongs to one concrete kind (articles, videos, ...) chosen
//! through a [`CategoryKind`] marker type. The kind fixes the XML tag and the
//! identifier representation, and it is part of the category's type, so a
//! parent always has the same kind as its child and categories of different
//! kinds never compare equal.
//!
//! Parents are shared through [`Arc`]. A child points at its parent, never
//! the reverse, and a parent is immutable once shared, so the public API
//! cannot form a cycle.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::{self, XmlCodec};
use crate::entity::{self, Entity, ID};
use crate::error::Result;
use crate::id::EntityId;
use crate::identity::{self, FieldValue, Identity, IdentityField};
use crate::node::Element;
use crate::properties::{self, Assignment, Properties, PropertyValue};
use crate::validation;

const DESCRIPTION: &str = "Description";
const LANGUAGE: &str = "Language";
const NAME: &str = "Name";
const PARENT: &str = "Parent";

/// Marker for one concrete family of categories.
pub trait CategoryKind: fmt::Debug + Clone + Send + Sync + 'static {
    /// Root element name of categories of this kind.
    const TAG: &'static str;

    type Id: EntityId;
}

/// A named, language-tagged node in a category tree.
///
/// Identity: `{Language, Name, Parent}`. Natural ordering
/// ([`Category::compare_to`]): name, case-insensitive.
#[derive(Debug, Clone)]
pub struct Category<K: CategoryKind> {
    id: K::Id,
    language: String,
    name: String,
    description: Option<String>,
    parent: Option<Arc<Category<K>>>,
    kind: PhantomData<K>,
}

impl<K: CategoryKind> Default for Category<K> {
    /// An unnamed category, used as the starting point of property-bag
    /// construction.
    fn default() -> Self {
        Self {
            id: K::Id::default(),
            language: String::new(),
            name: String::new(),
            description: None,
            parent: None,
            kind: PhantomData,
        }
    }
}

impl<K: CategoryKind> Category<K> {
    /// Creates a root category. Both values must be non-empty.
    pub fn new(language: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            language: validation::non_empty(LANGUAGE, language.into())?,
            name: validation::non_empty(NAME, name.into())?,
            ..Self::default()
        })
    }

    pub fn with_id(mut self, id: K::Id) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<Arc<Self>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        self.language = validation::non_empty(LANGUAGE, language.into())?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = validation::non_empty(NAME, name.into())?;
        Ok(())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// Returns the shared handle to the parent.
    pub fn parent_arc(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    pub fn set_parent(&mut self, parent: Option<Arc<Self>>) {
        self.parent = parent;
    }

    /// Iterates the parent chain, nearest first. The category itself is
    /// not included.
    pub fn ancestors(&self) -> Ancestors<'_, K> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Number of ancestors; `0` for a root.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// The topmost ancestor, or `self` for a root.
    pub fn root(&self) -> &Self {
        self.ancestors().last().unwrap_or(self)
    }

    /// Returns `true` if some ancestor equals `other`.
    pub fn is_descendant_of(&self, other: &Self) -> bool {
        self.ancestors().any(|ancestor| ancestor == other)
    }

    /// Names from the root down to this category.
    pub fn path(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ancestors().map(Self::name).collect();
        names.reverse();
        names.push(self.name());
        names
    }

    /// Orders by name, ignoring case.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.name.to_lowercase().cmp(&other.name.to_lowercase())
    }
}

/// Iterator over a category's ancestors. See [`Category::ancestors`].
pub struct Ancestors<'a, K: CategoryKind> {
    next: Option<&'a Category<K>>,
}

impl<'a, K: CategoryKind> Iterator for Ancestors<'a, K> {
    type Item = &'a Category<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

impl<K: CategoryKind> fmt::Display for Category<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<K: CategoryKind> Identity for Category<K> {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![
            IdentityField::new(LANGUAGE, self.language.as_str()),
            IdentityField::new(NAME, self.name.as_str()),
            IdentityField::new(PARENT, FieldValue::entity(self.parent())),
        ]
    }
}

impl<K: CategoryKind> PartialEq for Category<K> {
    fn eq(&self, other: &Self) -> bool {
        identity::equals(self, other)
    }
}

impl<K: CategoryKind> Eq for Category<K> {}

impl<K: CategoryKind> Hash for Category<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(identity::hash_code(self));
    }
}

impl<K: CategoryKind> XmlCodec for Category<K> {
    const TAG: &'static str = K::TAG;

    fn write_fields(&self, node: &mut Element) {
        entity::write_id(node, &self.id);
        node.push_leaf_opt(DESCRIPTION, self.description.as_deref());
        node.push_leaf(LANGUAGE, self.language.as_str());
        node.push_leaf(NAME, self.name.as_str());
        node.push_opt(self.parent.as_ref().map(|parent| parent.to_xml_as(PARENT)));
    }

    fn read_fields(node: &Element) -> Result<Self> {
        let parent = codec::optional_entity::<Self>(node, PARENT)?;
        let mut category = Self::new(
            codec::required_text(node, LANGUAGE)?,
            codec::required_text(node, NAME)?,
        )?;
        category.id = entity::read_id(node)?;
        category.description = codec::optional_text(node, DESCRIPTION);
        category.parent = parent.map(Arc::new);
        Ok(category)
    }
}

impl<K: CategoryKind> Properties for Category<K> {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            ID => self.id = entity::id_property(value)?,
            LANGUAGE => self.set_language(value.into_required_text(name)?)?,
            NAME => self.set_name(value.into_required_text(name)?)?,
            DESCRIPTION => self.description = value.into_text(name)?,
            PARENT => {
                self.parent = match value.into_bag(name)? {
                    Some(bag) => Some(Arc::new(properties::construct_nested(&bag)?)),
                    None => None,
                };
            }
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }

    fn validate(&self) -> Result<()> {
        validation::filled(LANGUAGE, &self.language)?;
        validation::filled(NAME, &self.name)
    }
}

impl<K: CategoryKind> Entity for Category<K> {
    type Id = K::Id;

    fn id(&self) -> &K::Id {
        &self.id
    }

    fn set_id(&mut self, id: K::Id) {
        self.id = id;
    }
}

/// Entities that may be filed under a category.
pub trait Categorized {
    type Kind: CategoryKind;

    fn category(&self) -> Option<&Category<Self::Kind>>;
}

/// Keeps the entities whose category equals `category`. Uncategorized
/// entities are skipped.
pub fn in_category<'a, T, I>(items: I, category: &Category<T::Kind>) -> Vec<&'a T>
where
    T: Categorized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| item.category() == Some(category))
        .collect()
}

/// Sorts by category name, ignoring case. Uncategorized entities come
/// first. The sort is stable.
pub fn sort_by_category_name<T: Categorized>(items: &mut [T]) {
    items.sort_by(compare_category_names);
}

/// Reverse of [`sort_by_category_name`]: uncategorized entities come last.
pub fn sort_by_category_name_desc<T: Categorized>(items: &mut [T]) {
    items.sort_by(|a, b| compare_category_names(b, a));
}

fn compare_category_names<T: Categorized>(a: &T, b: &T) -> Ordering {
    match (a.category(), b.category()) {
        (Some(x), Some(y)) => x.compare_to(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
