//! End-to-end behaviour of the folio entities: XML text round trips, identity
//! semantics across types, and property-bag construction from JSON.

use folio_config::{FolioConfig, load_config};
use folio_core::codec::{XmlCodec, from_xml_str, to_xml_string};
use folio_core::entity::Entity;
use folio_core::identity::{equals_dyn, hash_code};
use folio_core::properties::{self, PropertyBag, UnknownKeys};
use folio_core::xml::{self, WriteOptions, XmlError};
use folio_core::{Categorized, EntityError};
use folio_domain::categories::Downloads;
use folio_domain::{
    AnnouncementsCategory, Article, ArticlesCategory, DownloadsCategory, Image, Item,
    PlaycastsCategory, Poll, PollAnswer, StoredFile, TextsCategory, User, VideosCategory,
};
use pretty_assertions::assert_eq;

fn text_round_trip<T>(value: &T) -> T
where
    T: XmlCodec + std::fmt::Debug,
{
    for options in [WriteOptions::default(), WriteOptions::compact()] {
        let text = to_xml_string(value, &options).unwrap();
        from_xml_str::<T>(&text).unwrap();
    }
    let text = to_xml_string(value, &WriteOptions::default()).unwrap();
    from_xml_str(&text).unwrap()
}

fn file() -> StoredFile {
    StoredFile::new("image/jpeg", "photo.jpg", "IMG_0001.JPG", (0..=255).collect())
        .unwrap()
        .with_id(40)
}

// ---------------------------------------------------------------------------
// Round-trip law
// ---------------------------------------------------------------------------

#[test]
fn every_type_survives_text_round_trip() {
    let user = User::new("ann", "ann@example.com", "Ann").unwrap().with_id("u1");
    assert_eq!(text_round_trip(&user), user);

    let file = file();
    let back = text_round_trip(&file);
    assert_eq!(back, file);
    assert_eq!(back.data(), file.data());

    let image = Image::new(file.clone(), 480, 640).with_id(41);
    assert_eq!(text_round_trip(&image), image);

    let item = Item::new("en", "Notes").unwrap().with_text("  padded \n text ");
    let back = text_round_trip(&item);
    assert_eq!(back, item);
    assert_eq!(back.text(), Some("  padded \n text "));

    let article = Article::new("en", "Launch")
        .unwrap()
        .with_annotation("<b>bold</b> & more")
        .with_category(ArticlesCategory::new("en", "News").unwrap().with_id(2))
        .with_image(image);
    let back = text_round_trip(&article);
    assert_eq!(back, article);
    assert_eq!(back.annotation(), Some("<b>bold</b> & more"));

    let poll = Poll::new("en", "Lunch?")
        .unwrap()
        .with_answer(PollAnswer::new("Pizza").unwrap().with_votes(5))
        .with_answer(PollAnswer::new("Soup").unwrap());
    assert_eq!(text_round_trip(&poll), poll);

    let answer = PollAnswer::new("Salad").unwrap().with_votes(1);
    assert_eq!(text_round_trip(&answer), answer);
}

#[test]
fn every_category_kind_round_trips_with_its_tag() {
    let parent = VideosCategory::new("en", "Media").unwrap().with_id(1);
    let videos = VideosCategory::new("en", "Clips").unwrap().with_parent(parent);
    let text = to_xml_string(&videos, &WriteOptions::compact()).unwrap();
    assert!(text.starts_with("<VideosCategory>"));
    assert_eq!(from_xml_str::<VideosCategory>(&text).unwrap(), videos);

    let texts = TextsCategory::new("en", "Essays").unwrap();
    assert_eq!(text_round_trip(&texts), texts);
    let announcements = AnnouncementsCategory::new("en", "Events").unwrap();
    assert_eq!(text_round_trip(&announcements), announcements);
    let playcasts = PlaycastsCategory::new("en", "Shows").unwrap();
    assert_eq!(text_round_trip(&playcasts), playcasts);

    let downloads = DownloadsCategory::new("en", "Tools")
        .unwrap()
        .with_id(Some("tools".to_owned()))
        .with_parent(DownloadsCategory::new("en", "All").unwrap().with_id(Some("all".to_owned())));
    let back = text_round_trip(&downloads);
    assert_eq!(back, downloads);
    assert_eq!(back.parent().unwrap().id().as_deref(), Some("all"));
}

#[test]
fn timestamps_are_truncated_to_seconds() {
    let mut item = Item::new("en", "n").unwrap();
    let precise = chrono::DateTime::parse_from_rfc3339("2021-03-04T05:06:07.891Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    item.set_last_updated(precise);
    let back = text_round_trip(&item);
    assert_eq!(back.last_updated(), item.last_updated());
    assert_eq!(back.last_updated().timestamp_subsec_millis(), 0);
}

// ---------------------------------------------------------------------------
// Category scenarios
// ---------------------------------------------------------------------------

#[test]
fn category_without_parent() {
    let category = TextsCategory::new("language", "name").unwrap().with_id(1);
    let text = to_xml_string(&category, &WriteOptions::compact()).unwrap();
    assert_eq!(
        text,
        "<TextsCategory><Id>1</Id><Language>language</Language><Name>name</Name></TextsCategory>"
    );
    let back: TextsCategory = from_xml_str(&text).unwrap();
    assert_eq!(back.description(), None);
    assert!(back.parent().is_none());
}

#[test]
fn category_with_parent() {
    let parent = TextsCategory::new("parent.language", "parent.name")
        .unwrap()
        .with_id(2);
    let category = TextsCategory::new("language", "name")
        .unwrap()
        .with_id(1)
        .with_parent(parent);
    let text = to_xml_string(&category, &WriteOptions::compact()).unwrap();
    assert_eq!(
        text,
        concat!(
            "<TextsCategory><Id>1</Id><Language>language</Language><Name>name</Name>",
            "<Parent><Id>2</Id><Language>parent.language</Language><Name>parent.name</Name></Parent>",
            "</TextsCategory>"
        )
    );
    let back: TextsCategory = from_xml_str(&text).unwrap();
    assert_eq!(*back.parent().unwrap().id(), 2);
    assert_eq!(back, category);
}

#[test]
fn deep_parent_chain_parses_depth_first() {
    let mut category = TextsCategory::new("en", "level0").unwrap();
    for level in 1..=20 {
        category = TextsCategory::new("en", format!("level{level}"))
            .unwrap()
            .with_parent(category);
    }
    let back: TextsCategory = from_xml_str(&to_xml_string(&category, &WriteOptions::default()).unwrap()).unwrap();
    assert_eq!(back.depth(), 20);
    assert_eq!(back.root().name(), "level0");
    assert_eq!(back.path().len(), 21);
}

#[test]
fn same_fields_different_kinds_are_unequal() {
    let texts = TextsCategory::new("language", "name").unwrap().with_id(1);
    let videos = VideosCategory::new("language", "name").unwrap().with_id(1);
    assert!(!equals_dyn(&texts, &videos));
    assert!(!equals_dyn(&videos, &texts));
    // Same element content, different root tag: the parsed types still differ.
    let node = texts.to_xml();
    let as_videos = VideosCategory::from_xml(Some(&node)).unwrap();
    assert!(!equals_dyn(&texts, &as_videos));
}

// ---------------------------------------------------------------------------
// Sentinels and errors
// ---------------------------------------------------------------------------

#[test]
fn unset_optionals_are_omitted_and_parse_back_unset() {
    let category = DownloadsCategory::new("en", "Tools").unwrap();
    let node = category.to_xml();
    assert_eq!(node.child_names(), vec!["Language", "Name"]);
    let back = DownloadsCategory::from_xml(Some(&node)).unwrap();
    assert!(back.is_transient());
    assert_eq!(back.description(), None);

    let with_empty = category.with_description("");
    let back = DownloadsCategory::from_xml(Some(&with_empty.to_xml())).unwrap();
    assert_eq!(back.description(), Some(""));
}

#[test]
fn absent_node_is_invalid_argument() {
    assert_eq!(User::from_xml(None).unwrap_err(), EntityError::missing("xml"));
    assert_eq!(Poll::from_xml(None).unwrap_err(), EntityError::missing("xml"));
    assert_eq!(
        TextsCategory::from_xml(None).unwrap_err(),
        EntityError::missing("xml")
    );
}

#[test]
fn malformed_documents() {
    assert!(matches!(
        from_xml_str::<User>("<User><Name>n</User>"),
        Err(XmlError::Syntax(_))
    ));
    assert!(matches!(
        from_xml_str::<User>(""),
        Err(XmlError::Structure { .. })
    ));
    assert!(matches!(
        from_xml_str::<PollAnswer>("<PollAnswer><Text>t</Text><Votes>many</Votes></PollAnswer>"),
        Err(XmlError::Entity(EntityError::InvalidValue { .. }))
    ));
    assert!(matches!(
        from_xml_str::<PollAnswer>("<PollAnswer><Votes>1</Votes></PollAnswer>"),
        Err(XmlError::Entity(EntityError::InvalidArgument { .. }))
    ));
}

#[test]
fn unknown_elements_are_ignored() {
    let root = xml::from_str(
        "<User><Nickname>x</Nickname><Email>e</Email><Name>n</Name><Username>u</Username></User>",
    )
    .unwrap();
    assert_eq!(User::from_xml(Some(&root)).unwrap().username(), "u");
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[test]
fn non_identity_changes_keep_equality_and_hash() {
    let a = Poll::new("en", "Q").unwrap().with_answer(PollAnswer::new("A").unwrap());
    let mut b = a.clone().with_multi_select(true);
    b.item_mut().set_text(Some("changed".into()));
    b.set_id(99);
    b.answers_mut()[0].set_votes(10);
    assert_eq!(a, b);
    assert_eq!(hash_code(&a), hash_code(&b));

    b.item_mut().set_name("Other").unwrap();
    assert_ne!(a, b);
}

#[test]
fn identity_collections_ignore_order() {
    let answers = ["red", "green", "blue"].map(|t| PollAnswer::new(t).unwrap());
    let mut forward = Poll::new("en", "Colour").unwrap();
    forward.set_answers(answers.to_vec());
    let mut backward = Poll::new("en", "Colour").unwrap();
    backward.set_answers(answers.iter().rev().cloned().collect());
    assert_eq!(forward, backward);
    assert_eq!(hash_code(&forward), hash_code(&backward));
}

#[test]
fn entities_work_as_hash_set_members() {
    let mut set = std::collections::HashSet::new();
    set.insert(User::new("ann", "a@example.com", "Ann").unwrap());
    set.insert(User::new("ann", "other@example.com", "Annie").unwrap());
    set.insert(User::new("bob", "b@example.com", "Bob").unwrap());
    assert_eq!(set.len(), 2);
}

#[test]
fn nested_identity_recurses() {
    let a = Article::new("en", "A")
        .unwrap()
        .with_category(ArticlesCategory::new("en", "News").unwrap().with_parent(
            ArticlesCategory::new("en", "Root").unwrap(),
        ));
    let b = Article::new("de", "B")
        .unwrap()
        .with_category(ArticlesCategory::new("en", "News").unwrap().with_parent(
            ArticlesCategory::new("en", "Root").unwrap().with_description("ignored"),
        ));
    let c = Article::new("en", "A")
        .unwrap()
        .with_category(ArticlesCategory::new("en", "News").unwrap());
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// ---------------------------------------------------------------------------
// Categorized collections
// ---------------------------------------------------------------------------

#[test]
fn articles_by_category() {
    let news = ArticlesCategory::new("en", "news").unwrap();
    let blog = ArticlesCategory::new("en", "Blog").unwrap();
    let mut articles = vec![
        Article::new("en", "one").unwrap().with_category(news.clone()),
        Article::new("en", "two").unwrap(),
        Article::new("en", "three").unwrap().with_category(blog.clone()),
    ];

    let in_news = folio_core::category::in_category(&articles, &news);
    assert_eq!(in_news.len(), 1);
    assert_eq!(in_news[0].item().name(), "one");

    folio_core::category::sort_by_category_name(&mut articles);
    let names: Vec<_> = articles.iter().map(|a| a.item().name()).collect();
    assert_eq!(names, vec!["two", "three", "one"]);
    assert!(articles[0].category().is_none());
}

// ---------------------------------------------------------------------------
// Property bags
// ---------------------------------------------------------------------------

#[test]
fn article_from_json_bag() {
    let json = serde_json::json!({
        "Id": 12,
        "Language": "en",
        "Name": "Release notes",
        "Text": "Body",
        "Annotation": "Summary",
        "Category": { "Id": 3, "Language": "en", "Name": "News" },
        "Image": {
            "Height": 10,
            "Width": 20,
            "File": {
                "ContentType": "image/png",
                "Name": "n.png",
                "OriginalName": "n.png",
                "Data": "AAEC"
            }
        },
        "Rating": 5
    });
    let bag = PropertyBag::try_from(json).unwrap();
    let article: Article = properties::construct(Some(&bag), UnknownKeys::Ignore).unwrap();
    assert_eq!(*article.id(), 12);
    assert_eq!(article.item().text(), Some("Body"));
    assert_eq!(*article.category().unwrap().id(), 3);
    assert_eq!(article.image().unwrap().file().data(), [0u8, 1, 2].as_slice());

    assert_eq!(
        properties::construct::<Article>(Some(&bag), UnknownKeys::Reject).unwrap_err(),
        EntityError::invalid("Rating", "unknown property")
    );
}

#[test]
fn json_bag_errors() {
    let bag = PropertyBag::try_from(serde_json::json!({ "Username": "" })).unwrap();
    assert!(matches!(
        properties::construct::<User>(Some(&bag), UnknownKeys::Ignore),
        Err(EntityError::InvalidValue { .. })
    ));
    let bag = PropertyBag::try_from(serde_json::json!({ "Username": null })).unwrap();
    assert_eq!(
        properties::construct::<User>(Some(&bag), UnknownKeys::Ignore).unwrap_err(),
        EntityError::missing("Username")
    );
    assert_eq!(
        properties::construct::<User>(None, UnknownKeys::Ignore).unwrap_err(),
        EntityError::missing("properties")
    );
    assert!(PropertyBag::try_from(serde_json::json!("text")).is_err());
}

#[test]
fn json_bag_applies_in_source_order() {
    let json = r#"{"Username":"jdoe","Email":"j@example.com","Name":"J","Colour":"red","Age":40}"#;
    let bag = PropertyBag::try_from(serde_json::from_str::<serde_json::Value>(json).unwrap()).unwrap();
    let keys: Vec<_> = bag.iter().map(|(name, _)| name).collect();
    assert_eq!(keys, vec!["Username", "Email", "Name", "Colour", "Age"]);

    let mut user = User::default();
    assert_eq!(
        properties::apply(&mut user, Some(&bag), UnknownKeys::Reject).unwrap_err(),
        EntityError::invalid("Colour", "unknown property")
    );
    assert_eq!(user.username(), "jdoe");
    assert_eq!(user.name(), "J");
}

#[test]
fn nested_bags_must_be_complete() {
    let bag = PropertyBag::try_from(serde_json::json!({
        "Language": "en",
        "Name": "child",
        "Parent": { "Name": "p" }
    }))
    .unwrap();
    assert_eq!(
        properties::construct::<TextsCategory>(Some(&bag), UnknownKeys::Ignore).unwrap_err(),
        EntityError::missing("Language")
    );

    let bag = PropertyBag::try_from(serde_json::json!({
        "Language": "en",
        "Name": "a",
        "Category": { "Id": 3 }
    }))
    .unwrap();
    assert_eq!(
        properties::construct::<Article>(Some(&bag), UnknownKeys::Ignore).unwrap_err(),
        EntityError::missing("Language")
    );

    let bag = PropertyBag::try_from(serde_json::json!({
        "Language": "en",
        "Name": "a",
        "Image": { "Height": 1, "Width": 1, "File": { "Name": "n.png" } }
    }))
    .unwrap();
    assert_eq!(
        properties::construct::<Article>(Some(&bag), UnknownKeys::Ignore).unwrap_err(),
        EntityError::missing("ContentType")
    );

    let bag = PropertyBag::try_from(serde_json::json!({
        "Language": "en",
        "Name": "Lunch?",
        "Answers": [{ "Votes": 2 }]
    }))
    .unwrap();
    assert_eq!(
        properties::construct::<Poll>(Some(&bag), UnknownKeys::Ignore).unwrap_err(),
        EntityError::missing("Text")
    );
}

#[test]
fn complete_nested_bags_round_trip() {
    let bag = PropertyBag::try_from(serde_json::json!({
        "Language": "en",
        "Name": "child",
        "Parent": { "Language": "en", "Name": "p" }
    }))
    .unwrap();
    let category: TextsCategory = properties::construct(Some(&bag), UnknownKeys::Ignore).unwrap();
    assert_eq!(TextsCategory::from_xml(Some(&category.to_xml())).unwrap(), category);
}

#[test]
fn category_kind_bag_keeps_string_ids() {
    let bag = PropertyBag::try_from(serde_json::json!({
        "Id": "tools",
        "Language": "en",
        "Name": "Tools",
        "Parent": { "Id": "all", "Language": "en", "Name": "All" }
    }))
    .unwrap();
    let category: folio_core::Category<Downloads> =
        properties::construct(Some(&bag), UnknownKeys::Reject).unwrap();
    assert_eq!(category.id().as_deref(), Some("tools"));
    assert_eq!(category.parent().unwrap().id().as_deref(), Some("all"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_drives_output_and_bag_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.yaml");
    std::fs::write(
        &path,
        "xml:\n  indent: 0\n  declaration: true\nproperties:\n  unknown-keys: reject\n",
    )
    .unwrap();
    let config: FolioConfig = load_config(&path).unwrap();

    let answer = PollAnswer::new("Yes").unwrap();
    let text = to_xml_string(&answer, &config.write_options()).unwrap();
    assert_eq!(
        text,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><PollAnswer><Text>Yes</Text><Votes>0</Votes></PollAnswer>"
    );
    assert_eq!(from_xml_str::<PollAnswer>(&text).unwrap(), answer);

    let bag = PropertyBag::new().with("Text", "Yes").with("Colour", "red");
    assert!(properties::construct::<PollAnswer>(Some(&bag), config.unknown_keys()).is_err());
}
