use serde::{Deserialize, Serialize};
use slug::slugify;
use std::{fmt, str::FromStr};

/// Error produced when a slug would come out empty.
#[derive(Debug, thiserror::Error)]
#[error("article slug is empty")]
pub struct EmptySlug;

/// URL-safe identity of a persisted article.
///
/// A slug only exists once the save collaborator has assigned one; fresh
/// drafts carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleSlug(String);

impl ArticleSlug {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Derive a slug from an article title.
    ///
    /// # Errors
    /// Returns [`EmptySlug`] if the title contains nothing slug-worthy.
    pub fn from_title(title: &str) -> Result<Self, EmptySlug> {
        let generated = slugify(title);
        Self::from_str(&generated)
    }

    /// The route an article with this slug lives at.
    #[must_use]
    pub fn route(&self) -> String {
        format!("/article/{}", self.0)
    }
}

impl AsRef<str> for ArticleSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ArticleSlug {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ArticleSlug {
    type Err = EmptySlug;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmptySlug);
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for ArticleSlug {
    type Error = EmptySlug;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArticleSlug> for String {
    fn from(slug: ArticleSlug) -> Self {
        slug.into_string()
    }
}
