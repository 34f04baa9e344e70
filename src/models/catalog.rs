use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Textbook {
    pub id: i32,
    pub name: String,
    pub subject_id: i32,
    pub grade_id: i32,
    pub total_pages: i32,
}

impl Textbook {
    /// True when the textbook matches every filter that is present.
    #[must_use]
    pub fn matches(&self, subject_id: Option<i32>, grade_id: Option<i32>) -> bool {
        subject_id.is_none_or(|id| self.subject_id == id)
            && grade_id.is_none_or(|id| self.grade_id == id)
    }
}
