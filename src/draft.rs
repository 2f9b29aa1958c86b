//! Form state for the article editor.
//!
//! A [`Draft`] holds the working copy of an article's editable fields and the
//! validation rules attached to them. Rules are named pure predicates over a
//! single field's value; validity is their conjunction. The default rule set
//! contains exactly one rule: the tag list must not be empty.

use std::fmt;

use serde::Serialize;

use crate::{article::Article, tags::TagList};

/// The editable fields of an article form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Body,
    CoverImage,
    Tags,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Body => "body",
            Self::CoverImage => "cover_image",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Borrowed view of one field's current value, handed to validation rules.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Tags(&'a TagList),
}

/// A failed validation rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    /// The failing rule's reason, e.g. `"required"`.
    pub reason: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.field, self.reason)
    }
}

/// A named validation rule: a pure predicate over one field's value.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    field: Field,
    check: fn(FieldValue<'_>) -> Result<(), &'static str>,
}

impl Rule {
    /// The tag list must contain at least one tag.
    #[must_use]
    pub fn tags_required() -> Self {
        Self {
            field: Field::Tags,
            check: check_tags_required,
        }
    }

    /// The cover image reference, when set, must parse as a URL.
    ///
    /// Not part of the default rule set; install it with
    /// [`Draft::add_rule`].
    #[must_use]
    pub fn cover_image_is_url() -> Self {
        Self {
            field: Field::CoverImage,
            check: check_cover_image_url,
        }
    }

    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    fn evaluate(&self, value: FieldValue<'_>) -> Option<Violation> {
        (self.check)(value).err().map(|reason| Violation {
            field: self.field,
            reason,
        })
    }
}

fn check_tags_required(value: FieldValue<'_>) -> Result<(), &'static str> {
    match value {
        FieldValue::Tags(tags) if !tags.is_empty() => Ok(()),
        _ => Err("required"),
    }
}

fn check_cover_image_url(value: FieldValue<'_>) -> Result<(), &'static str> {
    match value {
        FieldValue::Text(text) if text.is_empty() => Ok(()),
        FieldValue::Text(text) => url::Url::parse(text).map(|_| ()).map_err(|_| "url"),
        FieldValue::Tags(_) => Err("url"),
    }
}

/// Working copy of an article's editable fields plus their validation rules.
#[derive(Debug, Clone)]
pub struct Draft {
    title: String,
    description: String,
    body: String,
    // empty string means "no cover image"; the snapshot turns it into None
    cover_image: String,
    tags: TagList,
    rules: Vec<Rule>,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    /// An empty draft with the default rule set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            body: String::new(),
            cover_image: String::new(),
            tags: TagList::new(),
            rules: vec![Rule::tags_required()],
        }
    }

    /// Attach an additional validation rule.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Fill the fields from `source` when present, or reset them to defaults.
    ///
    /// A source missing optional fields hydrates those to defaults; hydration
    /// never fails. Rules are kept either way.
    pub fn hydrate(&mut self, source: Option<&Article>) {
        match source {
            Some(article) => {
                self.title = article.title.clone();
                self.description = article.description.clone();
                self.body = article.body.clone();
                self.cover_image = article.cover_image.clone().unwrap_or_default();
                self.tags = article.tags.clone();
            }
            None => {
                self.title.clear();
                self.description.clear();
                self.body.clear();
                self.cover_image.clear();
                self.tags = TagList::new();
            }
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Set the cover image reference; an empty string clears it.
    pub fn set_cover_image(&mut self, cover_image: impl Into<String>) {
        self.cover_image = cover_image.into();
    }

    /// Replace the tag list wholesale.
    pub fn set_tags(&mut self, tags: TagList) {
        self.tags = tags;
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn cover_image(&self) -> &str {
        &self.cover_image
    }

    #[must_use]
    pub const fn tags(&self) -> &TagList {
        &self.tags
    }

    fn value_of(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Title => FieldValue::Text(&self.title),
            Field::Description => FieldValue::Text(&self.description),
            Field::Body => FieldValue::Text(&self.body),
            Field::CoverImage => FieldValue::Text(&self.cover_image),
            Field::Tags => FieldValue::Tags(&self.tags),
        }
    }

    /// Run every rule against its field; collect the failures.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(self.value_of(rule.field())))
            .collect()
    }

    /// True iff every field rule passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }

    /// Snapshot of the current values, for the draft-to-article merge.
    #[must_use]
    pub fn values(&self) -> DraftValues {
        DraftValues {
            title: self.title.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
            cover_image: if self.cover_image.is_empty() {
                None
            } else {
                Some(self.cover_image.clone())
            },
            tags: self.tags.clone(),
        }
    }
}

/// A point-in-time snapshot of a draft's editable values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftValues {
    pub title: String,
    pub description: String,
    pub body: String,
    pub cover_image: Option<String>,
    pub tags: TagList,
}
