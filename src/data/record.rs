//! Engagement Record
//! One typed row of the engagement CSV.

use serde::Serialize;

/// Column names expected in the CSV header.
pub const PLATFORM_COL: &str = "Platform";
pub const DATE_COL: &str = "Date";
pub const POST_TYPE_COL: &str = "PostType";
pub const AGE_GROUP_COL: &str = "AgeGroup";
pub const LIKES_COL: &str = "Likes";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    PLATFORM_COL,
    DATE_COL,
    POST_TYPE_COL,
    AGE_GROUP_COL,
    LIKES_COL,
];

/// A single social media post with its engagement count.
///
/// `likes` is always finite and non-negative once a record has been built by
/// the processor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub platform: String,
    pub post_type: String,
    pub age_group: String,
    pub date: String,
    pub likes: f64,
}

impl Record {
    pub fn new(
        platform: impl Into<String>,
        post_type: impl Into<String>,
        age_group: impl Into<String>,
        date: impl Into<String>,
        likes: f64,
    ) -> Self {
        Self {
            platform: platform.into(),
            post_type: post_type.into(),
            age_group: age_group.into(),
            date: date.into(),
            likes,
        }
    }
}
