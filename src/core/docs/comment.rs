//! Structured JSDoc parsing.
//!
//! Recognized tags:
//! - `@context <text>`: disambiguation context (first occurrence wins)
//! - `@param [{type}] name [-] description`: parameter documentation
//! - `@notranslate` (also `@no-translate`, `@noTranslate`): opt-out marker
//!
//! Other tags are kept as [`DocTag::Other`] and otherwise ignored. Untagged
//! lines before the first tag form the free-text description.

use swc_common::comments::{Comment, CommentKind};

const OPT_OUT_TAGS: &[&str] = &["notranslate", "no-translate", "noTranslate"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParam {
    pub name: String,
    pub ty: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    Context(String),
    Param(DocParam),
    NoTranslate,
    Other { name: String, text: String },
}

/// A parsed `/** ... */` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Untagged lines, trimmed, blank lines dropped.
    pub description: Vec<String>,
    pub tags: Vec<DocTag>,
}

impl DocComment {
    /// Parse a swc comment. Only `/** */` blocks are documentation.
    pub fn from_comment(comment: &Comment) -> Option<Self> {
        match comment.kind {
            CommentKind::Block => Self::parse(&comment.text),
            CommentKind::Line => None,
        }
    }

    /// Parse the text of a block comment (swc strips `/*` and `*/`).
    ///
    /// Returns `None` unless the block starts with the second `*` of `/**`.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.strip_prefix('*')?;
        // `/**/` and `/*** ... */` banners are not documentation
        if body.starts_with('*') || body.starts_with('/') {
            return None;
        }

        let mut doc = DocComment::default();
        let mut current: Option<(String, Vec<String>)> = None;

        for raw_line in body.lines() {
            let line = strip_gutter(raw_line);

            if let Some(rest) = line.strip_prefix('@') {
                if let Some((name, lines)) = current.take() {
                    doc.tags.push(DocTag::build(&name, &lines.join("\n")));
                }
                let (name, text) = split_word(rest);
                current = Some((name.to_string(), vec![text.to_string()]));
                continue;
            }

            match current.as_mut() {
                Some((_, lines)) => lines.push(line.to_string()),
                None if !line.is_empty() => doc.description.push(line.to_string()),
                None => {}
            }
        }

        if let Some((name, lines)) = current {
            doc.tags.push(DocTag::build(&name, &lines.join("\n")));
        }

        Some(doc)
    }

    pub fn context(&self) -> Option<&str> {
        self.tags.iter().find_map(|tag| match tag {
            DocTag::Context(context) => Some(context.as_str()),
            _ => None,
        })
    }

    pub fn param(&self, name: &str) -> Option<&DocParam> {
        self.tags.iter().find_map(|tag| match tag {
            DocTag::Param(param) if param.name == name => Some(param),
            _ => None,
        })
    }

    pub fn is_excluded(&self) -> bool {
        self.tags
            .iter()
            .any(|tag| matches!(tag, DocTag::NoTranslate))
    }

    /// The description as one note, or `None` when there is none.
    pub fn note(&self) -> Option<String> {
        if self.description.is_empty() {
            None
        } else {
            Some(self.description.join("\n"))
        }
    }
}

impl DocTag {
    fn build(name: &str, text: &str) -> Self {
        let text = text.trim();
        match name {
            "context" => DocTag::Context(collapse_lines(text)),
            "param" | "arg" | "argument" => match parse_param(text) {
                Some(param) => DocTag::Param(param),
                None => DocTag::Other {
                    name: name.to_string(),
                    text: text.to_string(),
                },
            },
            _ if OPT_OUT_TAGS.contains(&name) => DocTag::NoTranslate,
            _ => DocTag::Other {
                name: name.to_string(),
                text: text.to_string(),
            },
        }
    }
}

/// Remove the ` * ` gutter of a JSDoc line.
fn strip_gutter(line: &str) -> &str {
    let line = line.trim();
    match line.strip_prefix('*') {
        Some(rest) => rest.trim(),
        None => line,
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim_start()),
        None => (text, ""),
    }
}

fn collapse_lines(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse `[{type}] name [-] description`.
fn parse_param(text: &str) -> Option<DocParam> {
    let mut rest = text.trim_start();

    let mut ty = None;
    if rest.starts_with('{') {
        let end = matching_brace(rest)?;
        ty = Some(collapse_lines(&rest[1..end])).filter(|t| !t.is_empty());
        rest = rest[end + 1..].trim_start();
    }

    let (raw_name, description) = split_word(rest);
    // `[name=default]` marks an optional parameter
    let name = raw_name
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split('=')
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() {
        return None;
    }

    let description = description.trim_start();
    let description = description
        .strip_prefix('-')
        .map(str::trim_start)
        .unwrap_or(description);
    let description = collapse_lines(description);

    Some(DocParam {
        name: name.to_string(),
        ty,
        description: (!description.is_empty()).then_some(description),
    })
}

/// Index of the `}` closing the `{` at the start of `text`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_not_jsdoc() {
        assert!(DocComment::parse(" plain block ").is_none());
        assert!(DocComment::parse("*").is_some());
        assert!(DocComment::parse("**** banner ****").is_none());
    }

    #[test]
    fn test_single_line_context() {
        let doc = DocComment::parse("* @context menu ").unwrap();
        assert_eq!(doc.context(), Some("menu"));
        assert!(doc.description.is_empty());
    }

    #[test]
    fn test_first_context_wins() {
        let doc = DocComment::parse("*\n * @context dialog\n * @context menu\n ").unwrap();
        assert_eq!(doc.context(), Some("dialog"));
    }

    #[test]
    fn test_description_and_params() {
        let text = r#"*
     * Greeting shown on the dashboard.
     *
     * Keep it short.
     * @param {string} name - The user's display name
     * @param count number of unread
     *   messages in the inbox
     "#;
        let doc = DocComment::parse(text).unwrap();

        assert_eq!(
            doc.description,
            vec!["Greeting shown on the dashboard.", "Keep it short."]
        );
        assert_eq!(
            doc.param("name"),
            Some(&DocParam {
                name: "name".to_string(),
                ty: Some("string".to_string()),
                description: Some("The user's display name".to_string()),
            })
        );
        assert_eq!(
            doc.param("count").unwrap().description.as_deref(),
            Some("number of unread messages in the inbox")
        );
        assert_eq!(doc.param("count").unwrap().ty, None);
        assert_eq!(
            doc.note().as_deref(),
            Some("Greeting shown on the dashboard.\nKeep it short.")
        );
    }

    #[test]
    fn test_param_with_nested_type_and_optional_name() {
        let doc = DocComment::parse("* @param {{ id: number }} [user=guest] who").unwrap();
        let param = doc.param("user").unwrap();
        assert_eq!(param.ty.as_deref(), Some("{ id: number }"));
        assert_eq!(param.description.as_deref(), Some("who"));
    }

    #[test]
    fn test_opt_out_variants() {
        for text in [
            "* @notranslate",
            "* @no-translate",
            "* @noTranslate\n * reason",
        ] {
            assert!(DocComment::parse(text).unwrap().is_excluded(), "{text}");
        }
        assert!(!DocComment::parse("* @deprecated").unwrap().is_excluded());
    }

    #[test]
    fn test_unknown_tags_kept_but_ignored() {
        let doc = DocComment::parse("* Title\n * @see https://example.com").unwrap();
        assert_eq!(doc.description, vec!["Title"]);
        assert_eq!(
            doc.tags,
            vec![DocTag::Other {
                name: "see".to_string(),
                text: "https://example.com".to_string(),
            }]
        );
        assert_eq!(doc.context(), None);
    }

    #[test]
    fn test_multiline_context_collapsed() {
        let doc = DocComment::parse("*\n * @context settings\n *   dialog\n").unwrap();
        assert_eq!(doc.context(), Some("settings dialog"));
    }
}
