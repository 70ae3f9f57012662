use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::models::Heading;
use crate::slug::Slugger;

/// Collects every heading of a markdown body in document order.
///
/// Anchors come from an explicit `{#id}` attribute when present, otherwise
/// from the heading text, de-duplicated across the document.
pub fn headings(md: &str) -> Vec<Heading> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(md, options);

    let mut slugger = Slugger::new();
    let mut out = Vec::new();
    let mut current: Option<(u8, Option<String>, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((level as u8, id.map(|id| id.to_string()), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, buf)) = current.as_mut() {
                    buf.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, id, text)) = current.take() {
                    let text = text.trim().to_string();
                    let slug = match id {
                        Some(id) => {
                            // explicit ids still reserve their slot
                            slugger.slug(&id);
                            id
                        }
                        None => slugger.slug(&text),
                    };
                    out.push(Heading { depth, slug, text });
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(depth: u8, slug: &str, text: &str) -> Heading {
        Heading { depth, slug: slug.into(), text: text.into() }
    }

    #[test]
    fn test_headings_in_order() {
        let md = "# Title\n\nintro\n\n## Setup `cargo`\n\n### Step 1\n\n## Setup `cargo`\n";
        assert_eq!(
            headings(md),
            vec![
                h(1, "title", "Title"),
                h(2, "setup-cargo", "Setup cargo"),
                h(3, "step-1", "Step 1"),
                h(2, "setup-cargo-1", "Setup cargo"),
            ]
        );
    }

    #[test]
    fn test_explicit_id() {
        let md = "## Install {#install-guide}\n";
        assert_eq!(headings(md), vec![h(2, "install-guide", "Install")]);
    }

    #[test]
    fn test_code_fence_is_not_a_heading() {
        let md = "```\n# not a heading\n```\n\nSetext\n------\n";
        assert_eq!(headings(md), vec![h(2, "setext", "Setext")]);
    }

    #[test]
    fn test_multi_line_setext_heading() {
        let md = "Foo\nbar\n---\n\nOne\nTwo\n===\n";
        assert_eq!(
            headings(md),
            vec![h(2, "foo-bar", "Foo bar"), h(1, "one-two", "One Two")]
        );
    }
}
