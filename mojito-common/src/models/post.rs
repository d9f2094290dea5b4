// File: mojito-common/src/models/post.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author block embedded in every feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub username: String,
    #[serde(default)]
    pub avatar: String,
}

/// One entry of the home feed.
///
/// Only `_id` is required; it is the rendering key. Everything else the
/// backend sends is kept in `extra` so the record round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(rename = "createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PostAuthor>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn key(&self) -> &str {
        &self.id
    }
}
