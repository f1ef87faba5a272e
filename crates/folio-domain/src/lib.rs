//! Concrete folio entities.
//!
//! Every type here is a thin declaration plugged into the `folio-core`
//! machinery: it lists its identity fields, composes its XML codec from its
//! ancestor's, and routes property-bag keys to its validated setters.

pub mod article;
pub mod categories;
pub mod file;
pub mod image;
pub mod item;
pub mod poll;
pub mod user;

pub use article::Article;
pub use categories::{
    AnnouncementsCategory, ArticlesCategory, DownloadsCategory, PlaycastsCategory, TextsCategory,
    VideosCategory,
};
pub use file::StoredFile;
pub use image::Image;
pub use item::Item;
pub use poll::{Poll, PollAnswer};
pub use user::User;
