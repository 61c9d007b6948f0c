use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub nickname: String,
    pub mail: String,
}

impl Author {
    pub fn new(nickname: impl Into<String>, mail: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            mail: mail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub content: String,
    pub author: Author,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author,
        }
    }
}
