//! End-to-end flow: hydrate → edit → submit → navigate, against the bundled
//! file-backed store.

use std::sync::{Arc, Mutex};

use quill::{
    editor::{Editor, Navigate, SubmitOutcome},
    store::WorkspaceStore,
};

#[derive(Debug, Clone, Default)]
struct RecordingNavigator {
    paths: Arc<Mutex<Vec<String>>>,
}

impl Navigate for RecordingNavigator {
    fn navigate(&mut self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

#[tokio::test]
async fn drafting_and_publishing_a_new_article() {
    let root = tempfile::tempdir().unwrap();
    let store = WorkspaceStore::new(root.path());
    let navigator = RecordingNavigator::default();
    let paths = navigator.paths.clone();

    let mut editor = Editor::new(store.clone(), navigator);
    editor.set_title("Practical Form State");
    editor.set_description("Tag lists without duplicates");
    editor.set_body("# Practical Form State\n\nKeep the buffer separate.");

    // whitespace and duplicates never make it into the list
    for raw in ["rust", " rust ", "forms", "   "] {
        editor.set_tag_field(raw);
        editor.add_tag();
    }
    assert_eq!(editor.article().tags.as_slice(), ["rust", "forms"]);

    let outcome = editor.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Navigated("/article/practical-form-state".into())
    );
    assert_eq!(*paths.lock().unwrap(), ["/article/practical-form-state"]);

    let slug = editor.article().slug.clone().unwrap();
    let stored = store.load(&slug).await.unwrap();
    assert_eq!(stored.title, "Practical Form State");
    assert_eq!(stored.description, "Tag lists without duplicates");
    assert_eq!(stored.tags.as_slice(), ["rust", "forms"]);
    assert!(stored.created.is_some());
}

#[tokio::test]
async fn editing_a_stored_article_keeps_its_identity() {
    let root = tempfile::tempdir().unwrap();
    let store = WorkspaceStore::new(root.path());

    let mut editor = Editor::new(store.clone(), RecordingNavigator::default());
    editor.set_title("First Title");
    editor.set_tag_field("rust");
    editor.add_tag();
    editor.submit().await;
    let slug = editor.article().slug.clone().unwrap();

    // edit mode: hydrate from the loader, change fields, resubmit
    let stored = store.load(&slug).await.unwrap();
    let navigator = RecordingNavigator::default();
    let paths = navigator.paths.clone();
    let mut editor = Editor::with_article(store.clone(), navigator, stored);
    assert_eq!(editor.draft().title(), "First Title");
    assert_eq!(editor.draft().tags().as_slice(), ["rust"]);

    editor.set_title("Second Title");
    editor.set_tag_field("forms");
    editor.add_tag();

    let outcome = editor.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Navigated(_)));
    // the slug sticks even though the title changed
    assert_eq!(*paths.lock().unwrap(), [format!("/article/{slug}")]);

    let reloaded = store.load(&slug).await.unwrap();
    assert_eq!(reloaded.title, "Second Title");
    assert_eq!(reloaded.tags.as_slice(), ["rust", "forms"]);
}

#[tokio::test]
async fn a_rejected_save_leaves_the_editor_resumable() {
    let root = tempfile::tempdir().unwrap();
    let store = WorkspaceStore::new(root.path());
    let mut editor = Editor::new(store, RecordingNavigator::default());

    // blank title: the form itself is valid (tags present), but the store
    // cannot derive a slug and rejects
    editor.set_tag_field("rust");
    editor.add_tag();

    let outcome = editor.submit().await;
    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert!(editor.rejection().is_some());
    assert!(!editor.is_submitting());

    // fix the title and resubmit without re-entering anything else
    editor.set_title("Recovered");
    let outcome = editor.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Navigated("/article/recovered".into())
    );
}
