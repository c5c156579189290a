//! Printable tree documents
//!
//! The engine hands an assembled [`FamilyTree`] to a [`TreeRenderer`] and
//! wraps the bytes in a [`TreeExport`]. [`TextRenderer`] draws a plain-text
//! outline; richer formats plug in through the same trait.

use crate::error::GraphResult;
use crate::types::{FamilyTree, Person};
use crate::utils::format_date;

/// Longest name drawn in a box before truncation
const MAX_NAME_CHARS: usize = 18;

/// Turns a tree view into a document
pub trait TreeRenderer: Send + Sync {
    fn render(&self, tree: &FamilyTree) -> GraphResult<Vec<u8>>;

    /// MIME type of the rendered bytes
    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;
}

/// A rendered tree ready to be sent as a download
#[derive(Debug, Clone)]
pub struct TreeExport {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl TreeExport {
    pub fn render(tree: &FamilyTree, renderer: &dyn TreeRenderer) -> GraphResult<Self> {
        let bytes = renderer.render(tree)?;
        Ok(Self {
            file_name: file_name(tree, renderer.extension()),
            content_type: renderer.content_type(),
            bytes,
        })
    }
}

/// `tree-<family>-<given>-<first 8 chars of id>.<ext>`
fn file_name(tree: &FamilyTree, extension: &str) -> String {
    let id = tree.person.id.simple().to_string();
    format!(
        "tree-{}-{}-{}.{}",
        slug(&tree.person.family_name),
        slug(&tree.person.given_name),
        &id[..8],
        extension
    )
}

fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}

/// Layered plain-text outline, oldest generation first
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    fn label(person: &Person) -> String {
        let name = truncate(&person.full_name(), MAX_NAME_CHARS);
        match person.birth_date {
            Some(date) => format!("{} (b. {})", name, format_date(date)),
            None => name,
        }
    }

    fn section(out: &mut String, title: &str, persons: &[Person]) {
        out.push_str(title);
        out.push('\n');
        if persons.is_empty() {
            out.push_str("  -\n");
        }
        for person in persons {
            out.push_str("  ");
            out.push_str(&Self::label(person));
            out.push('\n');
        }
        out.push('\n');
    }
}

impl TreeRenderer for TextRenderer {
    fn render(&self, tree: &FamilyTree) -> GraphResult<Vec<u8>> {
        let mut out = String::new();
        let title = format!("Family tree of {}", tree.person.full_name());
        out.push_str(&title);
        out.push('\n');
        out.push_str(&"=".repeat(title.chars().count()));
        out.push_str("\n\n");

        Self::section(&mut out, "Grandparents", &tree.grandparents);
        Self::section(&mut out, "Parents", &tree.parents);

        out.push_str("Person\n");
        out.push_str(&format!("  * {} *\n\n", Self::label(&tree.person)));

        Self::section(&mut out, "Siblings", &tree.siblings);
        Ok(out.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(max - 1).collect();
        short.push('…');
        short
    }
}
