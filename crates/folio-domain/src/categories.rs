//! The category kinds used across the site.

use folio_core::category::{Category, CategoryKind};

/// Defines a category kind marker together with a `Category` alias for it.
macro_rules! define_category_kind {
    (
        $(
            $(#[$meta:meta])*
            ($kind:ident, $alias:ident, tag = $tag:expr, id = $id:ty)
        ),+ $(,)?
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $kind;

            impl CategoryKind for $kind {
                const TAG: &'static str = $tag;
                type Id = $id;
            }

            #[doc = concat!("A category of kind [`", stringify!($kind), "`].")]
            pub type $alias = Category<$kind>;
        )+
    };
}

define_category_kind! {
    /// Categories of articles.
    (Articles, ArticlesCategory, tag = "ArticlesCategory", id = i64),
    (Videos, VideosCategory, tag = "VideosCategory", id = i64),
    (Texts, TextsCategory, tag = "TextsCategory", id = i64),
    (Announcements, AnnouncementsCategory, tag = "AnnouncementsCategory", id = i64),
    /// Categories of playcasts (recorded shows).
    (Playcasts, PlaycastsCategory, tag = "PlaycastsCategory", id = i64),
    /// Categories of downloads. Keys are assigned externally.
    (Downloads, DownloadsCategory, tag = "DownloadsCategory", id = Option<String>),
}
