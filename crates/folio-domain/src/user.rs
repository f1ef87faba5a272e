//! Site users.

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

const DATE_CREATED: &str = "DateCreated";
const EMAIL: &str = "Email";
const LAST_UPDATED: &str = "LastUpdated";
const NAME: &str = "Name";
const USERNAME: &str = "Username";

/// A registered user, keyed by an externally assigned string id.
///
/// Identity: `{Username}`. Natural ordering: username.
#[derive(Debug, Clone)]
pub struct User {
    id: Option<String>,
    username: String,
    email: String,
    name: String,
    date_created: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = format::now();
        Self {
            id: None,
            username: String::new(),
            email: String::new(),
            name: String::new(),
            date_created: now,
            last_updated: now,
        }
    }
}

impl User {
    /// Creates a user stamped with the current time. All three values must
    /// be non-empty.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let mut user = Self::default();
        user.set_username(username)?;
        user.set_email(email)?;
        user.set_name(name)?;
        Ok(user)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> Result<()> {
        self.username = validation::non_empty(USERNAME, username.into())?;
        Ok(())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        self.email = validation::non_empty(EMAIL, email.into())?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = validation::non_empty(NAME, name.into())?;
        Ok(())
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

    /// Orders by username.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.username.cmp(&other.username)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Identity for User {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![IdentityField::new(USERNAME, self.username.as_str())]
    }
}

folio_core::identity_traits!(User);

impl XmlCodec for User {
    const TAG: &'static str = "User";

    fn write_fields(&self, node: &mut Element) {
        entity::write_id(node, &self.id);
        codec::push_instant(node, DATE_CREATED, &self.date_created);
        node.push_leaf(EMAIL, self.email.as_str());
        codec::push_instant(node, LAST_UPDATED, &self.last_updated);
        node.push_leaf(NAME, self.name.as_str());
        node.push_leaf(USERNAME, self.username.as_str());
    }

    fn read_fields(node: &Element) -> Result<Self> {
        let mut user = Self::new(
            codec::required_text(node, USERNAME)?,
            codec::required_text(node, EMAIL)?,
            codec::required_text(node, NAME)?,
        )?;
        user.id = entity::read_id(node)?;
        if let Some(at) = codec::optional_instant(node, DATE_CREATED)? {
            user.date_created = at;
        }
        if let Some(at) = codec::optional_instant(node, LAST_UPDATED)? {
            user.last_updated = at;
        }
        Ok(user)
    }
}

impl Properties for User {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            ID => self.id = entity::id_property(value)?,
            USERNAME => self.set_username(value.into_required_text(name)?)?,
            EMAIL => self.set_email(value.into_required_text(name)?)?,
            NAME => self.set_name(value.into_required_text(name)?)?,
            DATE_CREATED => self.set_date_created(value.into_instant(name)?),
            LAST_UPDATED => self.set_last_updated(value.into_instant(name)?),
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }
}

impl Entity for User {
    type Id = Option<String>;

    fn id(&self) -> &Option<String> {
        &self.id
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }
}
