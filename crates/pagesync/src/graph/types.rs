//! Wire types for the remote Graph API.

use serde::Deserialize;

/// Standard response envelope: a `data` array with optional pagination, or
/// an `error` object. Both can technically appear; `error` wins.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<Vec<T>>,
    pub paging: Option<Paging>,
    pub error: Option<ErrorBody>,
}

/// Pagination block; `next` is an absolute URL carrying the cursor and all
/// original query parameters, including the credential.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
}

/// Error object embedded in a response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<i64>,
}

impl ErrorBody {
    /// The error message, or a fallback when the envelope carries none.
    #[must_use]
    pub fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "unknown remote API error".to_string())
    }
}

/// A post as returned by `GET /{page}/posts?fields=id,message,created_time`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePost {
    pub id: String,
    pub message: Option<String>,
    pub created_time: String,
}

/// Comment author block.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAuthor {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A comment as returned by
/// `GET /{post}/comments?fields=id,message,created_time,from`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteComment {
    pub id: String,
    pub message: Option<String>,
    pub created_time: String,
    pub from: Option<RemoteAuthor>,
}

/// A reaction as returned by
/// `GET /{post}/reactions?fields=id,name,type,profile_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteReaction {
    /// Remote id of the reacting user.
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub reaction_type: String,
    pub profile_type: Option<String>,
}

/// One metric series from an insights endpoint.
///
/// For page metrics each value is a plain number; for the per-post
/// reactions-by-type insight the value is a `{reaction_type: count}` object.
/// Flattening interprets the JSON accordingly.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricSeries {
    pub name: Option<String>,
    pub period: Option<String>,
    #[serde(default)]
    pub values: Vec<MetricValue>,
}

/// One value/end-time pair in a metric series.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricValue {
    pub value: Option<serde_json::Value>,
    pub end_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_data_and_paging_deserializes() {
        let body = r#"{
            "data": [{"id": "1_2", "message": "hi", "created_time": "2024-01-01T00:00:00+0000"}],
            "paging": {"cursors": {"before": "a", "after": "b"}, "next": "https://example.com/next"}
        }"#;
        let env: Envelope<RemotePost> = serde_json::from_str(body).expect("valid envelope");
        let data = env.data.expect("data present");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].id, "1_2");
        assert_eq!(
            env.paging.and_then(|p| p.next).as_deref(),
            Some("https://example.com/next")
        );
        assert!(env.error.is_none());
    }

    #[test]
    fn envelope_with_error_deserializes() {
        let body = r#"{"error": {"message": "Invalid OAuth access token", "type": "OAuthException", "code": 190}}"#;
        let env: Envelope<RemotePost> = serde_json::from_str(body).expect("valid envelope");
        assert!(env.data.is_none());
        let error = env.error.expect("error present");
        assert_eq!(error.message_or_default(), "Invalid OAuth access token");
        assert_eq!(error.kind.as_deref(), Some("OAuthException"));
        assert_eq!(error.code, Some(190));
    }

    #[test]
    fn error_body_without_message_uses_fallback() {
        let error = ErrorBody {
            message: None,
            kind: None,
            code: None,
        };
        assert_eq!(error.message_or_default(), "unknown remote API error");
    }

    #[test]
    fn metric_series_accepts_object_and_numeric_values() {
        let body = r#"{
            "data": [
                {"name": "page_fans", "period": "day",
                 "values": [{"value": 120, "end_time": "2024-01-01T08:00:00+0000"}]},
                {"name": "post_reactions_by_type_total", "period": "lifetime",
                 "values": [{"value": {"like": 3, "love": 1}}]}
            ]
        }"#;
        let env: Envelope<MetricSeries> = serde_json::from_str(body).expect("valid envelope");
        let data = env.data.expect("data present");
        assert_eq!(data.len(), 2);
        assert!(data[0].values[0].value.as_ref().unwrap().is_number());
        assert!(data[1].values[0].value.as_ref().unwrap().is_object());
        assert!(data[1].values[0].end_time.is_none());
    }

    #[test]
    fn reaction_type_field_is_renamed() {
        let body = r#"{"id": "u1", "name": "Ada", "type": "LIKE", "profile_type": "user"}"#;
        let reaction: RemoteReaction = serde_json::from_str(body).expect("valid reaction");
        assert_eq!(reaction.reaction_type, "LIKE");
    }
}
