use std::fmt;

/// How to query elements in a live document: a kind plus the string to match
/// against that attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    TagName(String),
    Class(String),
    Name(String),
    Id(String),
}

impl Selector {
    pub fn tag(value: impl Into<String>) -> Self {
        Selector::TagName(value.into())
    }

    pub fn class(value: impl Into<String>) -> Self {
        Selector::Class(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Selector::Name(value.into())
    }

    pub fn id(value: impl Into<String>) -> Self {
        Selector::Id(value.into())
    }

    /// CSS form understood by both driver backends.
    pub fn to_css(&self) -> String {
        match self {
            Selector::TagName(value) => value.clone(),
            Selector::Class(value) => format!(".{}", value),
            Selector::Name(value) => format!("[name='{}']", value),
            Selector::Id(value) => format!("#{}", value),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::TagName(value) => write!(f, "tag_name={}", value),
            Selector::Class(value) => write!(f, "class={}", value),
            Selector::Name(value) => write!(f, "name={}", value),
            Selector::Id(value) => write!(f, "id={}", value),
        }
    }
}
