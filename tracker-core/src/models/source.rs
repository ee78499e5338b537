use serde::{Deserialize, Serialize};

/// A bibliographic reference attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheoreticalSource {
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Paper,
    Book,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Book => "book",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "paper" => Some(Self::Paper),
            "book" => Some(Self::Book),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSourceInput {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub title: String,
    pub url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSourceInput {
    #[serde(rename = "type")]
    pub source_type: Option<SourceType>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl UpdateSourceInput {
    pub fn apply_to(self, source: &mut TheoreticalSource) {
        if let Some(source_type) = self.source_type {
            source.source_type = source_type;
        }
        if let Some(title) = self.title {
            source.title = title;
        }
        if let Some(url) = self.url {
            source.url = Some(url);
        }
        if let Some(notes) = self.notes {
            source.notes = Some(notes);
        }
    }
}
