use serde::{Deserialize, Serialize};

/// Top-level organizational unit: Subject -> Topic -> SubTopic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub subject_id: String,
    pub name: String,
}

/// The finest-grained unit; tasks and confidence ratings attach here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTopic {
    pub id: String,
    pub topic_id: String,
    pub name: String,
    /// Unset difficulty is treated as medium by the revision ranker.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
