//! Conversion from wire types to database active models.

use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use uuid::Uuid;

use crate::entity::sentiment_label::SentimentLabel;
use crate::entity::{comment, post, reaction};

use super::error::GraphError;
use super::types::{RemoteComment, RemotePost, RemoteReaction};

/// Parse a timestamp as emitted by the Graph API.
///
/// The API uses `2024-01-15T08:30:00+0000` (no colon in the offset), which
/// is not valid RFC 3339; both shapes are accepted.
#[must_use]
pub fn parse_graph_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Build a post active model from a fetched remote post.
pub fn to_post_model(
    page_id: Uuid,
    remote: &RemotePost,
    synced_at: DateTime<FixedOffset>,
) -> Result<post::ActiveModel, GraphError> {
    let created_time = parse_graph_time(&remote.created_time).ok_or_else(|| {
        GraphError::decode(format!(
            "post {}: invalid created_time {:?}",
            remote.id, remote.created_time
        ))
    })?;

    Ok(post::ActiveModel {
        id: Set(Uuid::new_v4()),
        page_id: Set(page_id),
        remote_post_id: Set(remote.id.clone()),
        message: Set(remote.message.clone()),
        created_time: Set(created_time),
        synced_at: Set(synced_at),
    })
}

/// Build a comment active model from a fetched remote comment and its
/// already-computed sentiment label.
pub fn to_comment_model(
    post_id: Uuid,
    remote: &RemoteComment,
    sentiment: SentimentLabel,
    synced_at: DateTime<FixedOffset>,
) -> Result<comment::ActiveModel, GraphError> {
    let created_time = parse_graph_time(&remote.created_time).ok_or_else(|| {
        GraphError::decode(format!(
            "comment {}: invalid created_time {:?}",
            remote.id, remote.created_time
        ))
    })?;

    let author = remote.from.as_ref();

    Ok(comment::ActiveModel {
        id: Set(Uuid::new_v4()),
        post_id: Set(post_id),
        remote_comment_id: Set(remote.id.clone()),
        author_remote_id: Set(author.and_then(|a| a.id.clone())),
        author_name: Set(author.and_then(|a| a.name.clone())),
        message: Set(remote.message.clone()),
        created_time: Set(created_time),
        sentiment: Set(sentiment),
        synced_at: Set(synced_at),
    })
}

/// Build a reaction active model from a fetched remote reaction.
///
/// The API does not report when a reaction happened, so `created_time` is
/// the local observation time.
#[must_use]
pub fn to_reaction_model(
    post_id: Uuid,
    remote: &RemoteReaction,
    created_time: DateTime<FixedOffset>,
) -> reaction::ActiveModel {
    reaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        post_id: Set(post_id),
        user_remote_id: Set(remote.id.clone()),
        user_name: Set(remote.name.clone()),
        reaction_type: Set(remote.reaction_type.clone()),
        profile_type: Set(remote.profile_type.clone()),
        created_time: Set(created_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn set_value<T: Clone + Into<sea_orm::Value>>(value: &ActiveValue<T>) -> T {
        match value {
            ActiveValue::Set(v) | ActiveValue::Unchanged(v) => v.clone(),
            ActiveValue::NotSet => panic!("value not set"),
        }
    }

    #[test]
    fn parses_graph_offset_format() {
        let parsed = parse_graph_time("2024-01-15T08:30:00+0000").expect("parses");
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T08:30:00+00:00");
    }

    #[test]
    fn parses_rfc3339() {
        let parsed = parse_graph_time("2024-01-15T08:30:00+02:00").expect("parses");
        assert_eq!(parsed.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_graph_time("yesterday").is_none());
        assert!(parse_graph_time("").is_none());
    }

    #[test]
    fn post_model_carries_remote_fields() {
        let page_id = Uuid::new_v4();
        let remote = RemotePost {
            id: "123_456".to_string(),
            message: Some("hello".to_string()),
            created_time: "2024-01-15T08:30:00+0000".to_string(),
        };
        let model = to_post_model(page_id, &remote, Utc::now().fixed_offset()).expect("converts");
        assert_eq!(set_value(&model.page_id), page_id);
        assert_eq!(set_value(&model.remote_post_id), "123_456");
        assert_eq!(set_value(&model.message), Some("hello".to_string()));
    }

    #[test]
    fn post_model_rejects_bad_created_time() {
        let remote = RemotePost {
            id: "123_456".to_string(),
            message: None,
            created_time: "not-a-time".to_string(),
        };
        let err = to_post_model(Uuid::new_v4(), &remote, Utc::now().fixed_offset())
            .expect_err("invalid time should fail");
        assert!(matches!(err, GraphError::Decode { .. }));
    }

    #[test]
    fn comment_model_handles_missing_author() {
        let remote = RemoteComment {
            id: "c1".to_string(),
            message: None,
            created_time: "2024-01-15T08:30:00+0000".to_string(),
            from: None,
        };
        let model = to_comment_model(
            Uuid::new_v4(),
            &remote,
            SentimentLabel::Neutral,
            Utc::now().fixed_offset(),
        )
        .expect("converts");
        assert_eq!(set_value(&model.author_remote_id), None);
        assert_eq!(set_value(&model.author_name), None);
        assert_eq!(set_value(&model.sentiment), SentimentLabel::Neutral);
    }
}
