use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keywords,
        }
    }

    /// Parses `<name>: <keyword> <keyword>...`. The colon is required, the
    /// keywords are not.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (name, keywords) = line.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let keywords = keywords.split_whitespace().map(str::to_string).collect();
        Some(Self::new(name, keywords))
    }

    pub fn is_keyword_present(&self, word: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(word))
    }

    /// True when any keyword appears as a word of `text`, or the category
    /// name appears in it as a phrase. Both comparisons ignore case.
    pub fn matches(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        if contains_phrase(&lowered, &self.name.to_lowercase()) {
            return true;
        }
        lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| self.is_keyword_present(word))
    }

    pub(crate) fn merge_keywords(&mut self, keywords: &[String]) {
        for keyword in keywords {
            if !self.is_keyword_present(keyword) {
                self.keywords.push(keyword.clone());
            }
        }
    }
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    haystack.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
