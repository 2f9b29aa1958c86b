use color_eyre::eyre;
use dialoguer::{Confirm, Editor as BodyEditor, Input, Select, theme::ColorfulTheme};
use quill::{
    article::Article,
    editor::{Editor, Navigate, SaveArticle, SubmitOutcome},
    store::WorkspaceStore,
};
use tracing::info;

use crate::long_task;

/// Navigation collaborator for the terminal: announce where the saved
/// article now lives.
#[derive(Debug, Default)]
struct AnnounceNavigator;

impl Navigate for AnnounceNavigator {
    fn navigate(&mut self, path: &str) {
        info!("Article available at {path}");
    }
}

pub async fn run(
    store: WorkspaceStore,
    article: Option<Article>,
    title: Option<String>,
    emit_json: bool,
) -> eyre::Result<()> {
    let mut editor = match article {
        Some(article) => Editor::with_article(store, AnnounceNavigator, article),
        None => Editor::new(store, AnnounceNavigator),
    };
    if let Some(title) = title {
        editor.set_title(title);
    }

    let theme = ColorfulTheme::default();

    loop {
        prompt_fields(&mut editor, &theme)?;
        edit_tags(&mut editor, &theme)?;
        print_summary(&editor);

        if !editor.is_valid() {
            for violation in editor.violations() {
                eprintln!("✗ {violation}");
            }
        }

        let choice = Select::with_theme(&theme)
            .with_prompt("What now?")
            .items(&["Publish", "Keep editing", "Discard"])
            .default(0)
            .interact()?;
        match choice {
            0 => {}
            1 => continue,
            _ => {
                info!("Draft discarded");
                return Ok(());
            }
        }

        match long_task("Saving article...", editor.submit(), "Saved").await {
            SubmitOutcome::Navigated(path) => {
                if emit_json {
                    println!("{}", serde_json::to_string_pretty(editor.article())?);
                } else {
                    println!("→ {path}");
                }
                return Ok(());
            }
            SubmitOutcome::Invalid => {
                for violation in editor.violations() {
                    eprintln!("✗ {violation}");
                }
            }
            SubmitOutcome::Rejected => {
                if let Some(rejection) = editor.rejection() {
                    eprintln!(
                        "Save rejected: {}",
                        serde_json::to_string_pretty(rejection.payload())?
                    );
                }
                if !Confirm::with_theme(&theme)
                    .with_prompt("Try again?")
                    .default(true)
                    .interact()?
                {
                    return Ok(());
                }
            }
        }
    }
}

fn prompt_fields<S: SaveArticle, N: Navigate>(
    editor: &mut Editor<S, N>,
    theme: &ColorfulTheme,
) -> eyre::Result<()> {
    let title: String = Input::with_theme(theme)
        .with_prompt("Title")
        .with_initial_text(editor.draft().title())
        .allow_empty(true)
        .interact_text()?;
    editor.set_title(title);

    let description: String = Input::with_theme(theme)
        .with_prompt("Description")
        .with_initial_text(editor.draft().description())
        .allow_empty(true)
        .interact_text()?;
    editor.set_description(description);

    let cover_image: String = Input::with_theme(theme)
        .with_prompt("Cover image URL (empty for none)")
        .with_initial_text(editor.draft().cover_image())
        .allow_empty(true)
        .interact_text()?;
    editor.set_cover_image(cover_image);

    if Confirm::with_theme(theme)
        .with_prompt("Edit body in your editor?")
        .default(true)
        .interact()?
    {
        if let Some(body) = BodyEditor::new().edit(editor.draft().body())? {
            editor.set_body(body);
        }
    }

    Ok(())
}

fn edit_tags<S: SaveArticle, N: Navigate>(
    editor: &mut Editor<S, N>,
    theme: &ColorfulTheme,
) -> eyre::Result<()> {
    loop {
        let tags = editor.article().tags.as_slice();
        if !tags.is_empty() {
            println!("Tags: {}", tags.join(", "));
        }

        let input: String = Input::with_theme(theme)
            .with_prompt("Add tag (leave empty to continue)")
            .allow_empty(true)
            .interact_text()?;
        if input.trim().is_empty() {
            break;
        }
        editor.set_tag_field(input);
        editor.add_tag();
    }

    while !editor.article().tags.is_empty()
        && Confirm::with_theme(theme)
            .with_prompt("Remove a tag?")
            .default(false)
            .interact()?
    {
        let tags = editor.article().tags.as_slice().to_vec();
        let Some(index) = Select::with_theme(theme)
            .with_prompt("Which one?")
            .items(&tags)
            .interact_opt()?
        else {
            break;
        };
        editor.remove_tag(&tags[index]);
    }

    Ok(())
}

fn print_summary<S, N>(editor: &Editor<S, N>)
where
    S: SaveArticle,
    N: Navigate,
{
    let draft = editor.draft();
    println!();
    if draft.title().is_empty() {
        println!("(untitled)");
    } else {
        println!("{}", draft.title());
    }
    if !draft.description().is_empty() {
        println!("  {}", draft.description());
    }
    let cover = draft.cover_image();
    if !cover.is_empty() {
        println!("  cover: {cover}");
    }
    if !draft.tags().is_empty() {
        println!("  tags: {}", draft.tags().as_slice().join(", "));
    }
}
