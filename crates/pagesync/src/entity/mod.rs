//! SeaORM entity definitions for the pagesync database schema.

pub mod account;
pub mod comment;
pub mod insight;
pub mod page;
pub mod post;
pub mod prelude;
pub mod reaction;
pub mod reaction_summary;
pub mod sentiment_label;
