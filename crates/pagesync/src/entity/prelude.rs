//! Common re-exports for convenient entity usage.

pub use super::account::{
    ActiveModel as AccountActiveModel, Column as AccountColumn, Entity as Account,
    Model as AccountModel,
};
pub use super::comment::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as Comment,
    Model as CommentModel,
};
pub use super::insight::{
    ActiveModel as InsightActiveModel, Column as InsightColumn, Entity as Insight,
    Model as InsightModel,
};
pub use super::page::{
    ActiveModel as PageActiveModel, Column as PageColumn, Entity as Page, Model as PageModel,
};
pub use super::post::{
    ActiveModel as PostActiveModel, Column as PostColumn, Entity as Post, Model as PostModel,
};
pub use super::reaction::{
    ActiveModel as ReactionActiveModel, Column as ReactionColumn, Entity as Reaction,
    Model as ReactionModel,
};
pub use super::reaction_summary::{
    ActiveModel as ReactionSummaryActiveModel, Column as ReactionSummaryColumn,
    Entity as ReactionSummary, Model as ReactionSummaryModel,
};
pub use super::sentiment_label::SentimentLabel;
