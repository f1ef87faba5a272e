//! The shared ancestor of published content.
//!
//! [`Item`] holds the fields every piece of content has. Content types embed
//! an `Item` and compose their codec and property routing from it: they write
//! the item's elements first, hand the same node to [`Item::read_fields`]
//! when parsing, and pass property names they do not own on to
//! [`Item::set_property`](Properties::set_property).

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use folio_core::codec::{self, XmlCodec};
use folio_core::entity::{self, Entity, ID};
use folio_core::error::Result;
use folio_core::format;
use folio_core::identity::{Identity, IdentityField};
use folio_core::node::Element;
use folio_core::properties::{Assignment, Properties, PropertyValue};
use folio_core::validation;

const AUTHOR_ID: &str = "AuthorId";
const DATE_CREATED: &str = "DateCreated";
const LANGUAGE: &str = "Language";
const LAST_UPDATED: &str = "LastUpdated";
const NAME: &str = "Name";
const TEXT: &str = "Text";

/// A named, language-tagged piece of content.
///
/// Identity: `{Language, Name}`. Natural ordering: name, case-insensitive.
#[derive(Debug, Clone)]
pub struct Item {
    id: i64,
    author_id: Option<String>,
    date_created: DateTime<Utc>,
    language: String,
    last_updated: DateTime<Utc>,
    name: String,
    text: Option<String>,
}

impl Default for Item {
    fn default() -> Self {
        let now = format::now();
        Self {
            id: 0,
            author_id: None,
            date_created: now,
            language: String::new(),
            last_updated: now,
            name: String::new(),
            text: None,
        }
    }
}

impl Item {
    pub fn new(language: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let mut item = Self::default();
        item.set_language(language)?;
        item.set_name(name)?;
        Ok(item)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_author_id(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author_id.as_deref()
    }

    pub fn set_author_id(&mut self, author_id: Option<String>) {
        self.author_id = author_id;
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn set_date_created(&mut self, at: DateTime<Utc>) {
        self.date_created = format::truncate_instant(at);
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        self.language = validation::non_empty(LANGUAGE, language.into())?;
        Ok(())
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.last_updated = format::truncate_instant(at);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = validation::non_empty(NAME, name.into())?;
        Ok(())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Orders by name, ignoring case.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.name.to_lowercase().cmp(&other.name.to_lowercase())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Identity for Item {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![
            IdentityField::new(LANGUAGE, self.language.as_str()),
            IdentityField::new(NAME, self.name.as_str()),
        ]
    }
}

folio_core::identity_traits!(Item);

impl XmlCodec for Item {
    const TAG: &'static str = "Item";

    fn write_fields(&self, node: &mut Element) {
        entity::write_id(node, &self.id);
        node.push_leaf_opt(AUTHOR_ID, self.author_id.as_deref());
        codec::push_instant(node, DATE_CREATED, &self.date_created);
        node.push_leaf(LANGUAGE, self.language.as_str());
        codec::push_instant(node, LAST_UPDATED, &self.last_updated);
        node.push_leaf(NAME, self.name.as_str());
        node.push_leaf_opt(TEXT, self.text.as_deref());
    }

    fn read_fields(node: &Element) -> Result<Self> {
        let mut item = Self::new(
            codec::required_text(node, LANGUAGE)?,
            codec::required_text(node, NAME)?,
        )?;
        item.id = entity::read_id(node)?;
        item.author_id = codec::optional_text(node, AUTHOR_ID);
        item.text = codec::optional_text(node, TEXT);
        if let Some(at) = codec::optional_instant(node, DATE_CREATED)? {
            item.date_created = at;
        }
        if let Some(at) = codec::optional_instant(node, LAST_UPDATED)? {
            item.last_updated = at;
        }
        Ok(item)
    }
}

impl Properties for Item {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            ID => self.id = entity::id_property(value)?,
            AUTHOR_ID => self.author_id = value.into_text(name)?,
            DATE_CREATED => self.set_date_created(value.into_instant(name)?),
            LANGUAGE => self.set_language(value.into_required_text(name)?)?,
            LAST_UPDATED => self.set_last_updated(value.into_instant(name)?),
            NAME => self.set_name(value.into_required_text(name)?)?,
            TEXT => self.text = value.into_text(name)?,
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }
}

impl Entity for Item {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
