//! The article model and its draft merge.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{draft::DraftValues, slug::ArticleSlug, tags::TagList, utils};

/// A blog article: a fresh draft (no slug) or a persisted one.
///
/// The editable fields are mutated only through [`Article::apply`], which the
/// submission flow calls right before dispatching a save. Author and
/// timestamps are assigned by the save collaborator, not edited through the
/// form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Markdown source of the article body.
    #[serde(default)]
    pub body: String,
    /// Reference to a cover image, if the article carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: TagList,
    /// Assigned by the save collaborator on first successful save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<ArticleSlug>,
    #[serde(default)]
    pub author: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated: Option<OffsetDateTime>,
}

impl Article {
    /// Overwrite the editable fields with a draft snapshot.
    ///
    /// Each named field is copied individually; the tag list is replaced
    /// wholesale rather than merged element-wise. Slug, author and timestamps
    /// are untouched.
    pub fn apply(&mut self, values: DraftValues) {
        self.title = values.title;
        self.description = values.description;
        self.body = values.body;
        self.cover_image = values.cover_image;
        self.tags = values.tags;
    }

    /// Render the markdown body to HTML.
    #[must_use]
    pub fn body_html(&self) -> String {
        utils::render_markdown(&self.body)
    }

    /// Project the article into its listing preview.
    #[must_use]
    pub fn preview(&self) -> ArticlePreview {
        let description = if self.description.is_empty() {
            utils::excerpt(&self.body, 200)
        } else {
            self.description.clone()
        };
        ArticlePreview {
            title: self.title.clone(),
            description,
            tags: self.tags.as_slice().to_vec(),
            url: self.slug.as_ref().map(ArticleSlug::route),
        }
    }
}

/// Listing projection of an article.
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePreview {
    pub title: String,
    /// The article description, or an excerpt of the body when none was set.
    pub description: String,
    pub tags: Vec<String>,
    /// Route of the persisted article; `None` until a slug is assigned.
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::Article;
    use crate::draft::Draft;

    #[test]
    fn apply_overwrites_each_editable_field() {
        let mut article = Article {
            title: "old".into(),
            description: "old".into(),
            body: "old".into(),
            cover_image: Some("https://old.example/cover.png".into()),
            tags: vec!["old".to_string()].into(),
            author: "ferris".into(),
            ..Article::default()
        };

        let mut draft = Draft::new();
        draft.set_title("new");
        draft.set_body("new body");
        draft.set_tags(vec!["rust".to_string(), "forms".to_string()].into());

        article.apply(draft.values());

        assert_eq!(article.title, "new");
        assert_eq!(article.description, "");
        assert_eq!(article.body, "new body");
        assert_eq!(article.cover_image, None);
        assert_eq!(article.tags.as_slice(), ["rust", "forms"]);
        // not part of the form; merge leaves it alone
        assert_eq!(article.author, "ferris");
    }

    #[test]
    fn preview_falls_back_to_a_body_excerpt() {
        let article = Article {
            title: "Title".into(),
            body: "# Title\n\nSome prose".into(),
            ..Article::default()
        };
        let preview = article.preview();
        assert_eq!(preview.description, "Title Some prose");
        assert_eq!(preview.url, None);
    }
}
