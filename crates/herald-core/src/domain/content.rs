//! Content items produced by the generator workers.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ContentId;

/// Kind of content a generator produces (and platforms accept).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Blog,
    YoutubeShort,
    InstagramReel,
    FacebookStory,
}

impl ContentKind {
    /// Rotation used when distributing a weekly target across kinds.
    pub const ROTATION: [ContentKind; 4] = [
        ContentKind::Blog,
        ContentKind::YoutubeShort,
        ContentKind::InstagramReel,
        ContentKind::FacebookStory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::YoutubeShort => "youtube-short",
            ContentKind::InstagramReel => "instagram-reel",
            ContentKind::FacebookStory => "facebook-story",
        }
    }

    /// Human label used in precondition messages ("Only blog content ...").
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::YoutubeShort => "YouTube Short",
            ContentKind::InstagramReel => "Instagram Reel",
            ContentKind::FacebookStory => "Facebook Story",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editorial lifecycle of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentStatus {
    Draft,
    /// Generated and waiting for a human to approve it.
    PendingApproval,
    Approved,
    Scheduled,
    Published,
}

/// Well-known metadata keys.
pub mod keys {
    pub const SEO_SCORE: &str = "seoScore";
    pub const GEO_SCORE: &str = "geoScore";
    pub const GEO_GRADE: &str = "geoGrade";
    pub const GEO_BREAKDOWN: &str = "geoBreakdown";
    pub const GEO_RECOMMENDATIONS: &str = "geoRecommendations";
    pub const GEO_STRENGTHS: &str = "geoStrengths";
    pub const HEALING_ATTEMPTS: &str = "healingAttempts";
    pub const KEYWORDS: &str = "keywords";
    pub const VIDEO_URL: &str = "videoUrl";
    pub const THUMB_MEDIA_ID: &str = "thumbMediaId";
}

/// Open key/value metadata.
///
/// Generators may return arbitrary extra fields; they pass through untouched.
/// The accessors below cover the keys the pipeline itself reads or writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, serde_json::Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Sets `key` only when `value` is present.
    pub fn insert_opt<V: Into<serde_json::Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Copies every entry of `other`, overwriting existing keys.
    pub fn extend(&mut self, other: Metadata) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    fn u32_field(&self, key: &str) -> Option<u32> {
        self.get(key)
            .and_then(serde_json::Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(serde_json::Value::as_str)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn seo_score(&self) -> Option<u32> {
        self.u32_field(keys::SEO_SCORE)
    }

    pub fn geo_score(&self) -> Option<u32> {
        self.u32_field(keys::GEO_SCORE)
    }

    pub fn geo_grade(&self) -> Option<&str> {
        self.str_field(keys::GEO_GRADE)
    }

    pub fn geo_recommendations(&self) -> Vec<String> {
        self.string_list(keys::GEO_RECOMMENDATIONS)
    }

    pub fn healing_attempts(&self) -> Option<u32> {
        self.u32_field(keys::HEALING_ATTEMPTS)
    }

    pub fn keywords(&self) -> Vec<String> {
        self.string_list(keys::KEYWORDS)
    }

    pub fn video_url(&self) -> Option<&str> {
        self.str_field(keys::VIDEO_URL).filter(|s| !s.is_empty())
    }

    pub fn thumb_media_id(&self) -> Option<&str> {
        self.str_field(keys::THUMB_MEDIA_ID).filter(|s| !s.is_empty())
    }
}

impl FromIterator<(String, serde_json::Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A finished (or in-review) piece of content.
///
/// Treated as immutable once handed to the publishing queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub status: ContentStatus,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn new(
        id: ContentId,
        title: impl Into<String>,
        kind: ContentKind,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            status: ContentStatus::Draft,
            content: content.into(),
            metadata: Metadata::new(),
            created_at,
        }
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// First line of the body (used for duplicate detection and titles).
    pub fn first_line(&self) -> &str {
        self.content.split('\n').next().unwrap_or_default()
    }
}

/// Returns the first `max_chars` characters of `text` (never splits a code point).
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_kind_uses_kebab_case_names() {
        let s = serde_json::to_string(&ContentKind::YoutubeShort).unwrap();
        assert_eq!(s, "\"youtube-short\"");
        assert_eq!(ContentKind::InstagramReel.to_string(), "instagram-reel");
    }

    #[test]
    fn metadata_keeps_unknown_fields() {
        let raw = json!({ "seoScore": 91, "readingTime": "4 min", "keywords": ["ai", "seo"] });
        let meta: Metadata = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(meta.seo_score(), Some(91));
        assert_eq!(meta.keywords(), vec!["ai".to_string(), "seo".to_string()]);
        assert_eq!(meta.get("readingTime"), Some(&json!("4 min")));
        assert_eq!(serde_json::to_value(&meta).unwrap(), raw);
    }

    #[test]
    fn metadata_accessors_ignore_wrong_types() {
        let mut meta = Metadata::new();
        meta.insert(keys::SEO_SCORE, "high");
        meta.insert(keys::VIDEO_URL, "");

        assert_eq!(meta.seo_score(), None);
        assert_eq!(meta.video_url(), None);
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("héllo wörld", 7), "héllo w");
        assert_eq!(excerpt("short", 100), "short");
        assert_eq!(excerpt("", 3), "");
    }

    #[test]
    fn first_line_of_multiline_body() {
        let item = ContentItem::new(
            ContentId::from_ulid(ulid::Ulid::nil()),
            "t",
            ContentKind::Blog,
            "Headline\nbody text",
            Utc::now(),
        );
        assert_eq!(item.first_line(), "Headline");
    }
}
