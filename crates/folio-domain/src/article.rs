//! Articles.

use std::cmp::Ordering;
use std::fmt;

use folio_core::category::Categorized;
use folio_core::codec::{self, XmlCodec};
use folio_core::entity::Entity;
use folio_core::error::Result;
use folio_core::identity::{FieldValue, Identity, IdentityField};
use folio_core::node::Element;
use folio_core::properties::{self, Assignment, Properties, PropertyValue};

use crate::categories::{Articles, ArticlesCategory};
use crate::image::Image;
use crate::item::Item;

const ANNOTATION: &str = "Annotation";
const CATEGORY: &str = "Category";
const IMAGE: &str = "Image";

/// An article: an [`Item`] with an annotation, a category and a lead image.
///
/// The category is embedded under its own `ArticlesCategory` tag.
/// Identity: `{Category}`. Natural ordering: the item's.
#[derive(Debug, Clone, Default)]
pub struct Article {
    item: Item,
    annotation: Option<String>,
    category: Option<ArticlesCategory>,
    image: Option<Image>,
}

impl Article {
    pub fn new(language: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_item(Item::new(language, name)?))
    }

    /// Wraps an existing item.
    pub fn from_item(item: Item) -> Self {
        Self {
            item,
            ..Self::default()
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_category(mut self, category: ArticlesCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn item_mut(&mut self) -> &mut Item {
        &mut self.item
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    pub fn set_annotation(&mut self, annotation: Option<String>) {
        self.annotation = annotation;
    }

    pub fn set_category(&mut self, category: Option<ArticlesCategory>) {
        self.category = category;
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<Image>) {
        self.image = image;
    }

    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.item.compare_to(&other.item)
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.item, f)
    }
}

impl Categorized for Article {
    type Kind = Articles;

    fn category(&self) -> Option<&ArticlesCategory> {
        self.category.as_ref()
    }
}

impl Identity for Article {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![IdentityField::new(CATEGORY, FieldValue::entity(self.category.as_ref()))]
    }
}

folio_core::identity_traits!(Article);

impl XmlCodec for Article {
    const TAG: &'static str = "Article";

    fn write_fields(&self, node: &mut Element) {
        self.item.write_fields(node);
        node.push_leaf_opt(ANNOTATION, self.annotation.as_deref());
        node.push_opt(self.category.as_ref().map(XmlCodec::to_xml));
        node.push_opt(self.image.as_ref().map(XmlCodec::to_xml));
    }

    fn read_fields(node: &Element) -> Result<Self> {
        Ok(Self {
            item: Item::read_fields(node)?,
            annotation: codec::optional_text(node, ANNOTATION),
            category: codec::optional_entity(node, ArticlesCategory::TAG)?,
            image: codec::optional_entity(node, Image::TAG)?,
        })
    }
}

impl Properties for Article {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            ANNOTATION => self.annotation = value.into_text(name)?,
            CATEGORY => self.category = nested(name, value)?,
            IMAGE => self.image = nested(name, value)?,
            _ => return self.item.set_property(name, value),
        }
        Ok(Assignment::Applied)
    }
}

fn nested<T: Properties + Default>(name: &str, value: PropertyValue) -> Result<Option<T>> {
    value
        .into_bag(name)?
        .map(|bag| properties::construct_nested(&bag))
        .transpose()
}

impl Entity for Article {
    type Id = i64;

    fn id(&self) -> &i64 {
        self.item.id()
    }

    fn set_id(&mut self, id: i64) {
        self.item.set_id(id);
    }
}
