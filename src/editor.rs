//! The editing session: hydration, tag coordination and the submission flow.
//!
//! [`Editor`] drives one article through `idle → validating → submitting →
//! navigated | idle-with-error`. The save and navigation collaborators sit
//! behind the [`SaveArticle`] and [`Navigate`] traits; failures never escape
//! as errors — every outcome is observable state plus a [`SubmitOutcome`].

use std::fmt;

use futures::Stream;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, warn};

use crate::{
    article::Article,
    draft::{Draft, Field, Violation},
};

/// Opaque payload carried by a failed save, surfaced verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(Value);

impl Rejection {
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Convenience constructor for a `{"message": ...}` payload.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self(json!({ "message": text.into() }))
    }

    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Rejection {
    fn from(payload: Value) -> Self {
        Self(payload)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Persist an article. Implementations assign the slug.
pub trait SaveArticle {
    /// Persist `article`, resolving to the saved article (slug assigned) or
    /// rejecting with an opaque payload.
    fn save(&self, article: &Article)
    -> impl Future<Output = Result<Article, Rejection>> + Send;
}

/// Receive a navigation intent.
///
/// The editor fires and forgets: the transition's result is neither awaited
/// nor inspected.
pub trait Navigate {
    /// Move the surrounding application to `path`.
    fn navigate(&mut self, path: &str);
}

/// Observable state changes, one event per mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The draft was re-filled from a loaded article, or reset.
    Hydrated,
    /// A single editable field changed.
    FieldChanged(Field),
    /// The tag list changed, in the article and the draft alike.
    TagsChanged,
    /// The submitting flag flipped.
    SubmittingChanged(bool),
    /// The error surface changed: the error-visible flag flipped or a
    /// rejection payload was captured.
    ErrorChanged,
}

/// Result of a submit request, as data. Submission never panics or throws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft failed validation; the save collaborator was not contacted.
    Invalid,
    /// The save resolved; a navigation intent to the contained path was
    /// issued.
    Navigated(String),
    /// The save rejected; the payload is available from
    /// [`Editor::rejection`].
    Rejected,
}

/// An editing session over one article.
pub struct Editor<S, N> {
    article: Article,
    draft: Draft,
    tag_field: String,
    submitting: bool,
    has_error: bool,
    rejection: Option<Rejection>,
    store: S,
    navigator: N,
    subscribers: Vec<mpsc::UnboundedSender<EditorEvent>>,
}

impl<S, N> fmt::Debug for Editor<S, N> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Editor")
            .field("article", &self.article)
            .field("draft", &self.draft)
            .field("tag_field", &self.tag_field)
            .field("submitting", &self.submitting)
            .field("has_error", &self.has_error)
            .field("rejection", &self.rejection)
            .finish_non_exhaustive()
    }
}

impl<S, N> Editor<S, N>
where
    S: SaveArticle,
    N: Navigate,
{
    /// Start a blank editing session (new-article mode).
    pub fn new(store: S, navigator: N) -> Self {
        Self {
            article: Article::default(),
            draft: Draft::new(),
            tag_field: String::new(),
            submitting: false,
            has_error: false,
            rejection: None,
            store,
            navigator,
            subscribers: Vec::new(),
        }
    }

    /// Start a session over a loaded article (edit mode).
    pub fn with_article(store: S, navigator: N, article: Article) -> Self {
        let mut editor = Self::new(store, navigator);
        editor.hydrate(Some(article));
        editor
    }

    /// Replace the session state from `source`, or reset it to defaults.
    ///
    /// Hydration may happen well after construction (the loader is
    /// asynchronous); [`EditorEvent::Hydrated`] tells the bound view to
    /// re-read everything.
    pub fn hydrate(&mut self, source: Option<Article>) {
        match source {
            Some(article) => {
                self.draft.hydrate(Some(&article));
                self.article = article;
            }
            None => {
                self.draft.hydrate(None);
                self.article = Article::default();
            }
        }
        self.emit(EditorEvent::Hydrated);
    }

    /// Subscribe to state-change notifications.
    ///
    /// Each call returns an independent stream; events arrive in mutation
    /// order.
    pub fn events(&mut self) -> impl Stream<Item = EditorEvent> + Send + Sync + use<S, N> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        UnboundedReceiverStream::new(rx)
    }

    #[must_use]
    pub const fn article(&self) -> &Article {
        &self.article
    }

    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    #[must_use]
    pub fn tag_field(&self) -> &str {
        &self.tag_field
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.has_error
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    /// Shorthand for [`Draft::is_valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.draft.is_valid()
    }

    /// Shorthand for [`Draft::violations`].
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        self.draft.violations()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.set_title(title);
        self.emit(EditorEvent::FieldChanged(Field::Title));
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.set_description(description);
        self.emit(EditorEvent::FieldChanged(Field::Description));
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.draft.set_body(body);
        self.emit(EditorEvent::FieldChanged(Field::Body));
    }

    pub fn set_cover_image(&mut self, cover_image: impl Into<String>) {
        self.draft.set_cover_image(cover_image);
        self.emit(EditorEvent::FieldChanged(Field::CoverImage));
    }

    /// Replace the pending-tag input buffer.
    pub fn set_tag_field(&mut self, text: impl Into<String>) {
        self.tag_field = text.into();
    }

    /// Fold the pending-tag buffer into the tag list.
    ///
    /// The trimmed value is appended to the article's and the draft's tag
    /// lists, unless it is empty or already present. The buffer is cleared
    /// either way.
    pub fn add_tag(&mut self) {
        if self.article.tags.insert(&self.tag_field) {
            debug!(tag = self.tag_field.trim(), "tag added");
            self.draft.set_tags(self.article.tags.clone());
            self.emit(EditorEvent::TagsChanged);
        }
        self.tag_field.clear();
    }

    /// Remove `name` from the tag list (exact match).
    ///
    /// Runs the same revalidation path as addition: removing the last tag
    /// invalidates the form.
    pub fn remove_tag(&mut self, name: &str) {
        if self.article.tags.remove(name) {
            self.draft.set_tags(self.article.tags.clone());
            self.emit(EditorEvent::TagsChanged);
        }
    }

    /// Validate, merge the draft into the article and dispatch the save.
    ///
    /// An invalid draft never reaches the save collaborator. At most one save
    /// is outstanding at a time; preventing a second submit while
    /// [`Self::is_submitting`] returns true is the caller's responsibility —
    /// the editor neither queues nor cancels in-flight saves.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.draft.is_valid() {
            debug!("submit gated: draft is invalid");
            self.set_has_error(true);
            return SubmitOutcome::Invalid;
        }
        self.set_has_error(false);
        self.set_submitting(true);

        // merge strictly before dispatch; tag edits are already flushed into
        // the draft, so this snapshot cannot be stale
        self.article.apply(self.draft.values());

        match self.store.save(&self.article).await {
            Ok(saved) => {
                self.article = saved;
                match self.article.slug.clone() {
                    Some(slug) => {
                        let path = slug.route();
                        info!(slug = %slug, "article saved");
                        self.navigator.navigate(&path);
                        // the session is usually torn down by navigation, but
                        // clearing the flag must stay safe
                        self.set_submitting(false);
                        SubmitOutcome::Navigated(path)
                    }
                    None => {
                        warn!("save resolved without an assigned slug");
                        self.set_rejection(Rejection::message(
                            "save resolved without an assigned slug",
                        ));
                        self.set_submitting(false);
                        SubmitOutcome::Rejected
                    }
                }
            }
            Err(rejection) => {
                warn!(%rejection, "save rejected");
                self.set_rejection(rejection);
                self.set_submitting(false);
                SubmitOutcome::Rejected
            }
        }
    }

    fn set_submitting(&mut self, submitting: bool) {
        if self.submitting != submitting {
            self.submitting = submitting;
            self.emit(EditorEvent::SubmittingChanged(submitting));
        }
    }

    fn set_has_error(&mut self, has_error: bool) {
        if self.has_error != has_error {
            self.has_error = has_error;
            self.emit(EditorEvent::ErrorChanged);
        }
    }

    fn set_rejection(&mut self, rejection: Rejection) {
        self.rejection = Some(rejection);
        self.emit(EditorEvent::ErrorChanged);
    }

    fn emit(&mut self, event: EditorEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
