//! Client for the remote Graph-style page API.
//!
//! All requests are authenticated with a per-account access token passed as
//! a query parameter. Responses are JSON envelopes carrying either a `data`
//! array (plus an optional `paging.next` cursor URL) or an `error` object;
//! both shapes are mapped to typed failures here.

mod client;
mod convert;
mod error;
pub mod types;

pub use client::{GraphClient, PageBatch, DEFAULT_BASE_URL, DEFAULT_VERSION, MAX_PAGE_FOLLOWS};
pub use convert::{parse_graph_time, to_comment_model, to_post_model, to_reaction_model};
pub use error::{is_transient_error, GraphError};
