use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest comment a rating may carry, in characters.
pub const MAX_COMMENT_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Rating_ID")]
    pub rating_id: i64,
    #[serde(rename = "Emp_ID")]
    pub emp_id: i64,
    #[serde(rename = "Rating")]
    pub rating: i64,
    #[serde(rename = "Comments")]
    pub comments: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingView {
    #[serde(flatten)]
    pub rating: Rating,
    #[serde(rename = "Staff_Name")]
    pub staff_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    pub emp_id: i64,
    pub rating: i64,
    pub comments: String,
    pub date: NaiveDate,
}
