use pulldown_cmark::{Event, Parser, html::push_html};

pub(crate) fn to_html<'a>(events: impl IntoIterator<Item = Event<'a>>) -> String {
    let mut html = String::new();
    push_html(&mut html, events.into_iter());
    html
}

pub(crate) fn render_markdown(markdown: impl AsRef<str>) -> String {
    to_html(Parser::new(markdown.as_ref()))
}

/// Plain-text excerpt of a markdown document, cut after `limit` characters.
pub(crate) fn excerpt(markdown: &str, limit: usize) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        if let Event::Text(chunk) = event {
            if !text.is_empty()
                && !text.ends_with(char::is_whitespace)
                && !chunk.starts_with(char::is_whitespace)
            {
                text.push(' ');
            }
            text.push_str(&chunk);
            if text.chars().count() > limit {
                break;
            }
        }
    }

    let trimmed = text.trim_end();
    let mut result: String = trimmed.chars().take(limit).collect();
    if trimmed.chars().count() > limit {
        result.push('…');
    }
    result
}
