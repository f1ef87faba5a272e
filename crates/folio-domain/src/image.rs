//! Images backed by a stored file.

use folio_core::codec::{self, XmlCodec};
use folio_core::entity::{self, Entity, ID};
use folio_core::error::{EntityError, Result};
use folio_core::identity::{FieldValue, Identity, IdentityField};
use folio_core::node::Element;
use folio_core::properties::{self, Assignment, Properties, PropertyValue};

use crate::file::StoredFile;

const FILE: &str = "File";
const HEIGHT: &str = "Height";
const WIDTH: &str = "Width";

/// An image: a stored file plus its pixel dimensions.
///
/// Identity: `{File}`.
#[derive(Debug, Clone, Default)]
pub struct Image {
    id: i64,
    file: StoredFile,
    height: u32,
    width: u32,
}

impl Image {
    pub fn new(file: StoredFile, height: u32, width: u32) -> Self {
        Self {
            id: 0,
            file,
            height,
            width,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn file(&self) -> &StoredFile {
        &self.file
    }

    pub fn set_file(&mut self, file: StoredFile) {
        self.file = file;
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }
}

fn dimension(name: &str, value: PropertyValue) -> Result<u32> {
    let n = value.into_int(name)?;
    u32::try_from(n).map_err(|_| EntityError::invalid(name, format!("{n} is out of range")))
}

impl Identity for Image {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![IdentityField::new(FILE, FieldValue::entity(Some(&self.file)))]
    }
}

folio_core::identity_traits!(Image);

impl XmlCodec for Image {
    const TAG: &'static str = "Image";

    fn write_fields(&self, node: &mut Element) {
        entity::write_id(node, &self.id);
        node.push_leaf(HEIGHT, self.height.to_string());
        node.push_leaf(WIDTH, self.width.to_string());
        node.push(self.file.to_xml());
    }

    fn read_fields(node: &Element) -> Result<Self> {
        let file = codec::required_entity(node, StoredFile::TAG)?;
        let image = Self::new(
            file,
            codec::required_parse(node, HEIGHT)?,
            codec::required_parse(node, WIDTH)?,
        );
        Ok(image.with_id(entity::read_id(node)?))
    }
}

impl Properties for Image {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            ID => self.id = entity::id_property(value)?,
            HEIGHT => self.height = dimension(name, value)?,
            WIDTH => self.width = dimension(name, value)?,
            FILE => {
                let bag = value.into_bag(name)?.ok_or_else(|| EntityError::missing(name))?;
                self.file = properties::construct_nested(&bag)?;
            }
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }

    fn validate(&self) -> Result<()> {
        self.file.validate()
    }
}

impl Entity for Image {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
