//! Uploaded files.

use std::fmt;

use chrono::{DateTime, Utc};
use folio_core::codec::{self, XmlCodec};
use folio_core::entity::{self, Entity, ID};
use folio_core::error::{EntityError, Result};
use folio_core::format;
use folio_core::identity::{Identity, IdentityField};
use folio_core::node::Element;
use folio_core::properties::{Assignment, Properties, PropertyValue};
use folio_core::validation;

const CONTENT_TYPE: &str = "ContentType";
const DATA: &str = "Data";
const DATE_CREATED: &str = "DateCreated";
const LAST_UPDATED: &str = "LastUpdated";
const NAME: &str = "Name";
const ORIGINAL_NAME: &str = "OriginalName";
const SIZE: &str = "Size";

/// A stored binary file with its metadata.
///
/// `size` is always the length of `data`. Identity: `{Name}`.
#[derive(Debug, Clone)]
pub struct StoredFile {
    id: i64,
    content_type: String,
    name: String,
    original_name: String,
    data: Vec<u8>,
    date_created: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl Default for StoredFile {
    fn default() -> Self {
        let now = format::now();
        Self {
            id: 0,
            content_type: String::new(),
            name: String::new(),
            original_name: String::new(),
            data: Vec::new(),
            date_created: now,
            last_updated: now,
        }
    }
}

impl StoredFile {
    pub fn new(
        content_type: impl Into<String>,
        name: impl Into<String>,
        original_name: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<Self> {
        let mut file = Self::default();
        file.set_content_type(content_type)?;
        file.set_name(name)?;
        file.set_original_name(original_name)?;
        file.data = data;
        Ok(file)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> Result<()> {
        self.content_type = validation::non_empty(CONTENT_TYPE, content_type.into())?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = validation::non_empty(NAME, name.into())?;
        Ok(())
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn set_original_name(&mut self, original_name: impl Into<String>) -> Result<()> {
        self.original_name = validation::non_empty(ORIGINAL_NAME, original_name.into())?;
        Ok(())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    /// Length of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn set_date_created(&mut self, at: DateTime<Utc>) {
        self.date_created = format::truncate_instant(at);
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.last_updated = format::truncate_instant(at);
    }
}

impl fmt::Display for StoredFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Identity for StoredFile {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![IdentityField::new(NAME, self.name.as_str())]
    }
}

folio_core::identity_traits!(StoredFile);

impl XmlCodec for StoredFile {
    const TAG: &'static str = "File";

    fn write_fields(&self, node: &mut Element) {
        entity::write_id(node, &self.id);
        node.push_leaf(CONTENT_TYPE, self.content_type.as_str());
        node.push_leaf(DATA, format::encode_bytes(&self.data));
        codec::push_instant(node, DATE_CREATED, &self.date_created);
        codec::push_instant(node, LAST_UPDATED, &self.last_updated);
        node.push_leaf(NAME, self.name.as_str());
        node.push_leaf(ORIGINAL_NAME, self.original_name.as_str());
        node.push_leaf(SIZE, self.size().to_string());
    }

    /// `Size` is derived from `Data`; a stored value that disagrees is
    /// rejected.
    fn read_fields(node: &Element) -> Result<Self> {
        let mut file = Self::new(
            codec::required_text(node, CONTENT_TYPE)?,
            codec::required_text(node, NAME)?,
            codec::required_text(node, ORIGINAL_NAME)?,
            codec::required_bytes(node, DATA)?,
        )?;
        file.id = entity::read_id(node)?;
        if let Some(at) = codec::optional_instant(node, DATE_CREATED)? {
            file.date_created = at;
        }
        if let Some(at) = codec::optional_instant(node, LAST_UPDATED)? {
            file.last_updated = at;
        }
        if let Some(size) = codec::optional_parse::<usize>(node, SIZE)? {
            if size != file.size() {
                return Err(EntityError::invalid(
                    SIZE,
                    format!("{size} does not match {} bytes of data", file.size()),
                ));
            }
        }
        Ok(file)
    }
}

impl Properties for StoredFile {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            ID => self.id = entity::id_property(value)?,
            CONTENT_TYPE => self.set_content_type(value.into_required_text(name)?)?,
            NAME => self.set_name(value.into_required_text(name)?)?,
            ORIGINAL_NAME => self.set_original_name(value.into_required_text(name)?)?,
            DATA => self.set_data(value.into_bytes(name)?),
            DATE_CREATED => self.set_date_created(value.into_instant(name)?),
            LAST_UPDATED => self.set_last_updated(value.into_instant(name)?),
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }

    fn validate(&self) -> Result<()> {
        validation::filled(CONTENT_TYPE, &self.content_type)?;
        validation::filled(NAME, &self.name)?;
        validation::filled(ORIGINAL_NAME, &self.original_name)
    }
}

impl Entity for StoredFile {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
