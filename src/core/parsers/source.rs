use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use swc_common::{
    BytePos, FileName, Globals, SourceMap, Span, Spanned,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::error::{Error, Result};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments extracted from SingleThreadedComments during parsing.
///
/// Owned copies, so a parsed file can move across threads.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Comments attached directly before the token at `pos`.
    pub fn leading_at(&self, pos: BytePos) -> &[Comment] {
        self.leading
            .get(&pos)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

const BOM: char = '\u{feff}';

/// A parsed source file plus everything needed to map spans back to text.
pub struct ParsedSource {
    pub file_path: String,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    /// Full file text, including a leading byte order mark.
    code: String,
    start_pos: BytePos,
    /// Bytes of `code` before the text the parser saw.
    prefix_len: usize,
}

impl ParsedSource {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Offset where the parsed text starts, past any byte order mark.
    pub fn body_start(&self) -> usize {
        self.prefix_len
    }

    /// Byte offset of `pos` within this file's text.
    pub fn offset(&self, pos: BytePos) -> usize {
        self.prefix_len + pos.0.saturating_sub(self.start_pos.0) as usize
    }

    /// Source text covered by `span`.
    pub fn snippet(&self, span: Span) -> Option<&str> {
        self.code.get(self.offset(span.lo)..self.offset(span.hi))
    }

    /// 1-indexed line and column of `pos`.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col.0 + 1)
    }
}

/// TSX is only enabled for `.tsx`/`.jsx` so that `<T>value` casts in plain
/// `.ts` files still parse.
fn syntax_for(file_path: &str) -> Syntax {
    let tsx = matches!(
        Path::new(file_path).extension().and_then(|e| e.to_str()),
        Some("tsx" | "jsx")
    );
    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

fn parse_failure(
    source_map: &SourceMap,
    file_path: &str,
    span: Span,
    kind: &impl std::fmt::Debug,
) -> Error {
    let line = source_map.lookup_char_pos(span.lo).line;
    Error::Parse {
        file_path: file_path.to_string(),
        message: format!("line {}: {:?}", line, kind),
    }
}

/// Parse TypeScript/JavaScript source into an AST.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing. Recoverable
/// parser errors are reported as failures too: rewriting a file the parser
/// had to guess about is not safe.
pub fn parse_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        // The parser never sees the byte order mark; spans are shifted back
        // over it in `offset`.
        let prefix_len = if code.starts_with(BOM) {
            BOM.len_utf8()
        } else {
            0
        };
        let body = code[prefix_len..].to_string();
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), body);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| parse_failure(&source_map, file_path, e.span(), e.kind()))?;
        if let Some(e) = parser.take_errors().into_iter().next() {
            return Err(parse_failure(&source_map, file_path, e.span(), e.kind()));
        }

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            file_path: file_path.to_string(),
            module,
            source_map: Arc::clone(&source_map),
            comments: extracted_comments,
            code,
            start_pos: source_file.start_pos,
            prefix_len,
        })
    })
}
