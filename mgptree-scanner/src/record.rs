use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Primary key assigned to every mathematician by the genealogy project.
pub type PersonId = u32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("empty name")]
    Empty,

    #[error("only one name found in '{0}', expected 'Last, First[, Middle]'")]
    MissingGivenName(String),
}

/// A person's name split into family, given and (optional) middle parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonName {
    pub last: String,
    pub first: String,
    pub middle: Option<String>,
}

impl PersonName {
    pub fn new(last: &str, first: &str, middle: Option<&str>) -> Self {
        Self {
            last: last.to_string(),
            first: first.to_string(),
            middle: middle.filter(|m| !m.is_empty()).map(str::to_string),
        }
    }

    /// Parse a `Last, First[, Middle]` line.
    ///
    /// Lines without a comma are read as whitespace separated
    /// `Last First [Middle...]`. Any further parts after the given name are
    /// joined into the middle name.
    pub fn parse(line: &str) -> Result<Self, NameError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(NameError::Empty);
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some((last, rest)) = line.split_once(',') {
            parts.push(last.trim().to_string());
            parts.extend(rest.replace(',', " ").split_whitespace().map(str::to_string));
        } else {
            parts.extend(line.split_whitespace().map(str::to_string));
        }

        if parts.len() < 2 || parts[0].is_empty() {
            return Err(NameError::MissingGivenName(line.to_string()));
        }

        let middle = parts[2..].join(" ");
        Ok(Self::new(&parts[0], &parts[1], Some(&middle)))
    }

    /// Split a display name such as `Alan Mathison Turing` (as printed on a
    /// record page) into its parts. The final word is the family name.
    pub fn from_display(display: &str) -> Option<Self> {
        let words: Vec<&str> = display.split_whitespace().collect();
        match words.as_slice() {
            [] => None,
            [only] => Some(Self::new(only, "", None)),
            [first, middle @ .., last] => Some(Self::new(last, first, Some(&middle.join(" ")))),
        }
    }

    /// Human readable `First Middle Last`.
    pub fn label(&self) -> String {
        [Some(self.first.as_str()), self.middle.as_deref(), Some(self.last.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Same family and given name, ignoring case.
    pub fn matches(&self, other: &PersonName) -> bool {
        self.last.to_lowercase() == other.last.to_lowercase()
            && self.first.to_lowercase() == other.first.to_lowercase()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.last, self.first)?;
        if let Some(middle) = &self.middle {
            write!(f, ", {}", middle)?;
        }
        Ok(())
    }
}

/// Everything extracted from a single record page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub id: PersonId,
    pub name: PersonName,
    pub title: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub advisors: Vec<PersonId>,
}

impl PersonProfile {
    pub fn new(id: PersonId, name: PersonName) -> Self {
        Self {
            id,
            name,
            title: None,
            institution: None,
            year: None,
            advisors: Vec::new(),
        }
    }

    pub fn with_advisors(mut self, advisors: Vec<PersonId>) -> Self {
        self.advisors = advisors;
        self
    }
}
