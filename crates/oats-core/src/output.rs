use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Named output sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Paths,
    Webhooks,
    Definitions,
    Parameters,
    Responses,
    Components,
    /// Raw-schema mode on version 3 input.
    Schemas,
    Operations,
    Express,
    Handlers,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Paths => "paths",
            Section::Webhooks => "webhooks",
            Section::Definitions => "definitions",
            Section::Parameters => "parameters",
            Section::Responses => "responses",
            Section::Components => "components",
            Section::Schemas => "schemas",
            Section::Operations => "operations",
            Section::Express => "express",
            Section::Handlers => "handlers",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section name → type-syntax fragment, in the order sections were opened.
///
/// A key is present whenever the engine opened the section, even if no
/// source data filled it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Output {
    sections: IndexMap<Section, String>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `section` with empty text, leaving existing text alone.
    pub fn open(&mut self, section: Section) {
        self.sections.entry(section).or_default();
    }

    /// Replace the text of `section`.
    pub fn set(&mut self, section: Section, text: impl Into<String>) {
        self.sections.insert(section, text.into());
    }

    /// Append to `section`, opening it first if needed.
    pub fn append(&mut self, section: Section, text: &str) {
        self.sections.entry(section).or_default().push_str(text);
    }

    pub fn get(&self, section: Section) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }

    pub fn contains(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> {
        self.sections.iter().map(|(s, text)| (*s, text.as_str()))
    }

    /// Strip leading and trailing whitespace from every section.
    pub fn trimmed(mut self) -> Self {
        for text in self.sections.values_mut() {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                *text = trimmed.to_string();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_does_not_clobber() {
        let mut output = Output::new();
        output.append(Section::Paths, "a");
        output.open(Section::Paths);
        assert_eq!(output.get(Section::Paths), Some("a"));
        output.open(Section::Webhooks);
        assert_eq!(output.get(Section::Webhooks), Some(""));
        assert!(!output.contains(Section::Express));
    }

    #[test]
    fn test_trimmed() {
        let mut output = Output::new();
        output.set(Section::Components, "\n\n  schemas: {}\n  \n");
        output.set(Section::Paths, "");
        let output = output.trimmed();
        assert_eq!(output.get(Section::Components), Some("schemas: {}"));
        assert_eq!(output.get(Section::Paths), Some(""));
    }

    #[test]
    fn test_serializes_as_map() {
        let mut output = Output::new();
        output.set(Section::Operations, "x");
        output.set(Section::Paths, "y");
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"operations":"x","paths":"y"}"#);
    }
}
