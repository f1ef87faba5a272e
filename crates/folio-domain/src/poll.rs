//! Polls and their answers.

use std::cmp::Ordering;
use std::fmt;

use folio_core::codec::{self, XmlCodec};
use folio_core::entity::{self, Entity, ID};
use folio_core::error::{EntityError, Result};
use folio_core::identity::{FieldValue, Identity, IdentityField};
use folio_core::node::Element;
use folio_core::properties::{self, Assignment, Properties, PropertyValue};
use folio_core::validation;

use crate::item::Item;

const ANSWERS: &str = "Answers";
const LANGUAGE: &str = "Language";
const MULTI_SELECT: &str = "MultiSelect";
const NAME: &str = "Name";
const TEXT: &str = "Text";
const VOTES: &str = "Votes";

/// One selectable answer of a [`Poll`].
///
/// Identity: `{Text}`.
#[derive(Debug, Clone, Default)]
pub struct PollAnswer {
    id: i64,
    text: String,
    votes: u64,
}

impl PollAnswer {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let mut answer = Self::default();
        answer.set_text(text)?;
        Ok(answer)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_votes(mut self, votes: u64) -> Self {
        self.votes = votes;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.text = validation::non_empty(TEXT, text.into())?;
        Ok(())
    }

    pub fn votes(&self) -> u64 {
        self.votes
    }

    pub fn set_votes(&mut self, votes: u64) {
        self.votes = votes;
    }

    /// Records one more vote.
    pub fn vote(&mut self) {
        self.votes = self.votes.saturating_add(1);
    }
}

impl fmt::Display for PollAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Identity for PollAnswer {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![IdentityField::new(TEXT, self.text.as_str())]
    }
}

folio_core::identity_traits!(PollAnswer);

impl XmlCodec for PollAnswer {
    const TAG: &'static str = "PollAnswer";

    fn write_fields(&self, node: &mut Element) {
        entity::write_id(node, &self.id);
        node.push_leaf(TEXT, self.text.as_str());
        node.push_leaf(VOTES, self.votes.to_string());
    }

    fn read_fields(node: &Element) -> Result<Self> {
        let mut answer = Self::new(codec::required_text(node, TEXT)?)?;
        answer.id = entity::read_id(node)?;
        answer.votes = codec::optional_parse::<u64>(node, VOTES)?.unwrap_or_default();
        Ok(answer)
    }
}

impl Properties for PollAnswer {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            ID => self.id = entity::id_property(value)?,
            TEXT => self.set_text(value.into_required_text(name)?)?,
            VOTES => {
                let n = value.into_int(name)?;
                self.votes = u64::try_from(n)
                    .map_err(|_| EntityError::invalid(name, format!("{n} is negative")))?;
            }
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }

    fn validate(&self) -> Result<()> {
        validation::filled(TEXT, &self.text)
    }
}

impl Entity for PollAnswer {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// A poll: an [`Item`] whose text is the question, with a set of answers.
///
/// Identity: `{Language, Name, Answers}`; answers compare as a set, so
/// their order does not matter. Natural ordering: the item's.
#[derive(Debug, Clone, Default)]
pub struct Poll {
    item: Item,
    multi_select: bool,
    answers: Vec<PollAnswer>,
}

impl Poll {
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

    pub fn with_multi_select(mut self, multi_select: bool) -> Self {
        self.multi_select = multi_select;
        self
    }

    pub fn with_answer(mut self, answer: PollAnswer) -> Self {
        self.answers.push(answer);
        self
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn item_mut(&mut self) -> &mut Item {
        &mut self.item
    }

    pub fn multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn set_multi_select(&mut self, multi_select: bool) {
        self.multi_select = multi_select;
    }

    pub fn answers(&self) -> &[PollAnswer] {
        &self.answers
    }

    pub fn answers_mut(&mut self) -> &mut Vec<PollAnswer> {
        &mut self.answers
    }

    pub fn set_answers(&mut self, answers: Vec<PollAnswer>) {
        self.answers = answers;
    }

    /// Sum of the votes over all answers.
    pub fn total_votes(&self) -> u64 {
        self.answers.iter().map(PollAnswer::votes).sum()
    }

    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.item.compare_to(&other.item)
    }
}

impl fmt::Display for Poll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.item, f)
    }
}

impl Identity for Poll {
    fn identity(&self) -> Vec<IdentityField<'_>> {
        vec![
            IdentityField::new(LANGUAGE, self.item.language()),
            IdentityField::new(NAME, self.item.name()),
            IdentityField::new(ANSWERS, FieldValue::entities(&self.answers)),
        ]
    }
}

folio_core::identity_traits!(Poll);

impl XmlCodec for Poll {
    const TAG: &'static str = "Poll";

    fn write_fields(&self, node: &mut Element) {
        self.item.write_fields(node);
        node.push_leaf(MULTI_SELECT, self.multi_select.to_string());
        codec::push_entity_list(node, ANSWERS, &self.answers);
    }

    fn read_fields(node: &Element) -> Result<Self> {
        Ok(Self {
            item: Item::read_fields(node)?,
            multi_select: codec::optional_parse::<bool>(node, MULTI_SELECT)?.unwrap_or_default(),
            answers: codec::entity_list(node, ANSWERS)?,
        })
    }
}

impl Properties for Poll {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment> {
        match name {
            MULTI_SELECT => self.multi_select = value.into_bool(name)?,
            ANSWERS => {
                self.answers = value
                    .into_list(name)?
                    .into_iter()
                    .map(|answer| {
                        let bag = answer.into_bag(name)?.ok_or_else(|| EntityError::missing(name))?;
                        properties::construct_nested(&bag)
                    })
                    .collect::<Result<_>>()?;
            }
            _ => return self.item.set_property(name, value),
        }
        Ok(Assignment::Applied)
    }
}

impl Entity for Poll {
    type Id = i64;

    fn id(&self) -> &i64 {
        self.item.id()
    }

    fn set_id(&mut self, id: i64) {
        self.item.set_id(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::properties::{PropertyBag, UnknownKeys};
    use pretty_assertions::assert_eq;

    fn answer(text: &str, votes: u64) -> PollAnswer {
        PollAnswer::new(text).unwrap().with_votes(votes)
    }

    fn poll() -> Poll {
        let item = Item::new("language", "name").unwrap().with_id(1).with_text("text");
        Poll::from_item(item)
            .with_multi_select(true)
            .with_answer(answer("yes", 3).with_id(10))
            .with_answer(answer("no", 4).with_id(11))
    }

    #[test]
    fn answer_xml() {
        let answer = answer("yes", 3).with_id(10);
        let xml = answer.to_xml();
        assert_eq!(xml.child_names(), vec!["Id", "Text", "Votes"]);
        let back = PollAnswer::from_xml(Some(&xml)).unwrap();
        assert_eq!(back, answer);
        assert_eq!(back.votes(), 3);
    }

    #[test]
    fn answer_votes_default_to_zero() {
        let xml = Element::new("PollAnswer").with_leaf("Text", "maybe");
        assert_eq!(PollAnswer::from_xml(Some(&xml)).unwrap().votes(), 0);
    }

    #[test]
    fn poll_xml_order() {
        let xml = poll().to_xml();
        assert_eq!(
            xml.child_names(),
            vec![
                "Id",
                "DateCreated",
                "Language",
                "LastUpdated",
                "Name",
                "Text",
                "MultiSelect",
                "Answers"
            ]
        );
        assert_eq!(xml.child_text("MultiSelect"), Some("true"));
        assert_eq!(
            xml.child("Answers").unwrap().child_names(),
            vec!["PollAnswer", "PollAnswer"]
        );
    }

    #[test]
    fn poll_round_trip() {
        let poll = poll();
        let back = Poll::from_xml(Some(&poll.to_xml())).unwrap();
        assert_eq!(back, poll);
        assert!(back.multi_select());
        assert_eq!(back.total_votes(), 7);
        assert_eq!(back.item().text(), Some("text"));
    }

    #[test]
    fn no_answers_no_wrapper() {
        let poll = Poll::new("en", "Empty").unwrap();
        let xml = poll.to_xml();
        assert!(xml.child("Answers").is_none());
        assert_eq!(xml.child_text("MultiSelect"), Some("false"));
        assert!(Poll::from_xml(Some(&xml)).unwrap().answers().is_empty());
    }

    #[test]
    fn answers_compare_as_a_set() {
        let reordered = Poll::new("language", "name")
            .unwrap()
            .with_answer(answer("no", 0))
            .with_answer(answer("yes", 0));
        assert_eq!(reordered, poll());
        assert_eq!(
            folio_core::identity::hash_code(&reordered),
            folio_core::identity::hash_code(&poll())
        );

        let mut fewer = poll();
        fewer.answers_mut().pop();
        assert_ne!(fewer, poll());
    }

    #[test]
    fn bad_multi_select_is_invalid_value() {
        let xml = Element::new("Poll")
            .with_leaf("Language", "en")
            .with_leaf("Name", "n")
            .with_leaf("MultiSelect", "perhaps");
        assert!(matches!(
            Poll::from_xml(Some(&xml)),
            Err(EntityError::InvalidValue { ref name, .. }) if name == "MultiSelect"
        ));
    }

    #[test]
    fn properties() {
        let bag = PropertyBag::new()
            .with("Language", "en")
            .with("Name", "Lunch?")
            .with("MultiSelect", true)
            .with(
                "Answers",
                vec![
                    PropertyValue::from(PropertyBag::new().with("Text", "Pizza").with("Votes", 2)),
                    PropertyValue::from(PropertyBag::new().with("Text", "Soup")),
                ],
            );
        let poll: Poll = properties::construct(Some(&bag), UnknownKeys::Reject).unwrap();
        assert!(poll.multi_select());
        assert_eq!(poll.answers().len(), 2);
        assert_eq!(poll.total_votes(), 2);
        assert_eq!(poll.to_string(), "Lunch?");

        let bag = PropertyBag::new().with("Answers", vec![PropertyValue::from("Pizza")]);
        assert!(matches!(
            properties::construct::<Poll>(Some(&bag), UnknownKeys::Ignore),
            Err(EntityError::InvalidValue { .. })
        ));
    }

    #[test]
    fn voting() {
        let mut answer = answer("yes", u64::MAX - 1);
        answer.vote();
        answer.vote();
        assert_eq!(answer.votes(), u64::MAX);
    }
}
