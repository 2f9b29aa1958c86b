//! File-backed persistence for articles.
//!
//! Layout under the workspace root:
//! ```text
//! /workspace-root
//! ├── articles
//! │   ├── my-first-article
//! │   │   ├── Article.toml
//! │   │   ├── article.md
//! ```
//! `Article.toml` carries the metadata record; the markdown body lives next
//! to it in `article.md`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use tokio::fs;
use tracing::debug;

use crate::{
    article::Article,
    editor::{Rejection, SaveArticle},
    slug::{ArticleSlug, EmptySlug},
    tags::TagList,
};

/// Errors from hydrating an article off disk.
#[derive(Debug, thiserror::Error)]
pub enum FailToOpenArticle {
    /// No article directory under the given slug.
    #[error("article not found")]
    NotFound,
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The metadata record does not parse.
    #[error("invalid article record: {0}")]
    InvalidRecord(#[from] toml::de::Error),
}

#[derive(Debug, thiserror::Error)]
enum FailToSaveArticle {
    #[error("title produces an empty slug")]
    EmptySlug(#[from] EmptySlug),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The persisted metadata record. Every field is optional on the way in so a
/// sparse record hydrates to defaults instead of failing.
#[derive(Debug, Serialize, Deserialize)]
struct ArticleRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover_image: Option<String>,
    #[serde(default)]
    tags: TagList,
    #[serde(default)]
    author: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    created: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    updated: Option<OffsetDateTime>,
}

impl ArticleRecord {
    fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            cover_image: article.cover_image.clone(),
            tags: article.tags.clone(),
            author: article.author.clone(),
            created: article.created,
            updated: article.updated,
        }
    }

    fn into_article(self, slug: ArticleSlug, body: String) -> Article {
        Article {
            title: self.title,
            description: self.description,
            body,
            cover_image: self.cover_image,
            tags: self.tags,
            slug: Some(slug),
            author: self.author,
            created: self.created,
            updated: self.updated,
        }
    }
}

/// A file-backed save collaborator and article loader.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    root: PathBuf,
}

impl WorkspaceStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn articles_dir(&self) -> PathBuf {
        self.root.join("articles")
    }

    fn article_dir(&self, slug: &ArticleSlug) -> PathBuf {
        self.articles_dir().join(slug.as_str())
    }

    /// Hydrate the article stored under `slug`.
    ///
    /// Missing record fields fall back to defaults; a missing body file is an
    /// empty body.
    ///
    /// # Errors
    /// Returns [`FailToOpenArticle::NotFound`] if no article directory exists
    /// for the slug, and I/O or parse errors otherwise.
    pub async fn load(&self, slug: &ArticleSlug) -> Result<Article, FailToOpenArticle> {
        let dir = self.article_dir(slug);
        if fs::metadata(&dir).await.is_err() {
            return Err(FailToOpenArticle::NotFound);
        }

        let record = fs::read_to_string(dir.join("Article.toml")).await?;
        let record: ArticleRecord = toml::from_str(&record)?;

        let body = match fs::read_to_string(dir.join("article.md")).await {
            Ok(body) => body,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(record.into_article(slug.clone(), body))
    }

    async fn persist(&self, article: &Article) -> Result<Article, FailToSaveArticle> {
        // first saves derive the slug from the title; later saves keep it
        let slug = match &article.slug {
            Some(slug) => slug.clone(),
            None => ArticleSlug::from_title(&article.title)?,
        };

        let dir = self.article_dir(&slug);
        fs::create_dir_all(&dir).await?;

        let now = OffsetDateTime::now_utc();
        let mut saved = article.clone();
        saved.slug = Some(slug.clone());
        saved.created = article.created.or(Some(now));
        saved.updated = Some(now);
        if saved.author.is_empty() {
            saved.author = detect_local_user();
        }

        let record = ArticleRecord::from_article(&saved);
        // serialization of the record never fails
        let record = toml::to_string_pretty(&record).expect("article record serializes to TOML");
        fs::write(dir.join("Article.toml"), record.as_bytes()).await?;
        fs::write(dir.join("article.md"), saved.body.as_bytes()).await?;

        debug!(slug = %slug, "article persisted");
        Ok(saved)
    }
}

impl SaveArticle for WorkspaceStore {
    fn save(
        &self,
        article: &Article,
    ) -> impl Future<Output = Result<Article, Rejection>> + Send {
        let store = self.clone();
        let article = article.clone();
        async move { store.persist(&article).await.map_err(|err| reject(&err)) }
    }
}

fn detect_local_user() -> String {
    whoami::realname()
}

/// Fold an internal failure into a `{"errors": {field: [reason]}}` payload.
fn reject(error: &FailToSaveArticle) -> Rejection {
    let (field, reason) = match error {
        FailToSaveArticle::EmptySlug(_) => ("title", "can't be blank".to_string()),
        FailToSaveArticle::Io(err) => ("article", err.to_string()),
    };
    let mut fields = serde_json::Map::new();
    fields.insert(field.to_string(), json!([reason]));
    Rejection::new(json!({ "errors": fields }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::WorkspaceStore;
    use crate::{article::Article, editor::SaveArticle, slug::ArticleSlug};

    fn article(title: &str) -> Article {
        Article {
            title: title.into(),
            description: "a description".into(),
            body: "# Hello\n\nbody".into(),
            tags: vec!["rust".to_string(), "forms".to_string()].into(),
            ..Article::default()
        }
    }

    #[tokio::test]
    async fn save_assigns_slug_and_round_trips() {
        let root = tempfile::tempdir().unwrap();
        let store = WorkspaceStore::new(root.path());

        let saved = store.save(&article("My First Article")).await.unwrap();
        let slug = saved.slug.clone().unwrap();
        assert_eq!(slug.as_str(), "my-first-article");
        assert!(saved.created.is_some());
        assert!(saved.updated.is_some());
        assert!(!saved.author.is_empty());

        let loaded = store.load(&slug).await.unwrap();
        assert_eq!(loaded.title, saved.title);
        assert_eq!(loaded.description, saved.description);
        assert_eq!(loaded.body, saved.body);
        assert_eq!(loaded.tags, saved.tags);
        assert_eq!(loaded.slug, saved.slug);
    }

    #[tokio::test]
    async fn resaving_keeps_the_slug_and_creation_time() {
        let root = tempfile::tempdir().unwrap();
        let store = WorkspaceStore::new(root.path());

        let first = store.save(&article("My Article")).await.unwrap();
        let mut edited = first.clone();
        edited.title = "A Different Title".into();

        let second = store.save(&edited).await.unwrap();
        assert_eq!(second.slug, first.slug);
        assert_eq!(second.created, first.created);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_with_a_field_error() {
        let root = tempfile::tempdir().unwrap();
        let store = WorkspaceStore::new(root.path());

        let rejection = store.save(&article("   ")).await.unwrap_err();
        assert_eq!(
            rejection.payload(),
            &json!({ "errors": { "title": ["can't be blank"] } })
        );
    }

    #[tokio::test]
    async fn loading_an_unknown_slug_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let store = WorkspaceStore::new(root.path());
        let slug: ArticleSlug = "missing".parse().unwrap();

        assert!(matches!(
            store.load(&slug).await,
            Err(super::FailToOpenArticle::NotFound)
        ));
    }

    #[tokio::test]
    async fn sparse_records_hydrate_to_defaults() {
        let root = tempfile::tempdir().unwrap();
        let store = WorkspaceStore::new(root.path());
        let slug: ArticleSlug = "sparse".parse().unwrap();

        let dir = store.articles_dir().join(slug.as_str());
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("Article.toml"), "title = \"Sparse\"\n")
            .await
            .unwrap();

        let loaded = store.load(&slug).await.unwrap();
        assert_eq!(loaded.title, "Sparse");
        assert_eq!(loaded.description, "");
        assert_eq!(loaded.body, "");
        assert!(loaded.tags.is_empty());
        assert_eq!(loaded.created, None);
    }
}
