//! Text edits that turn message functions into `translate(...)` calls.
//!
//! Edits replace byte ranges of the original text so that everything outside
//! the literal expressions (formatting, comments, types) is preserved.

use swc_ecma_ast::{Expr, ImportSpecifier, Lit, ModuleDecl, ModuleItem, Stmt};

use crate::core::options::{ArgMode, TransformOptions};
use crate::core::parsers::ParsedSource;

/// Replace `start..end` of the original text with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }
}

/// Apply non-overlapping edits. Edits are applied back to front so earlier
/// offsets stay valid.
pub fn apply_edits(code: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));
    let mut output = code.to_string();
    for edit in edits {
        output.replace_range(edit.start..edit.end, &edit.replacement);
    }
    output
}

/// Double-quoted JavaScript string literal.
pub fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// The call expression that replaces a message body.
///
/// ```text
/// translate("1a2b3c4d5e")
/// translate("1a2b3c4d5e", { name })              // named
/// translate("1a2b3c4d5e", { "0": name })         // indexed
/// translate("1a2b3c4d5e", { defaultValue: "Hi" })
/// `⟦${translate("1a2b3c4d5e")}⟧`                 // debug
/// ```
pub fn call_expression<'p>(
    id: &str,
    text: &str,
    params: impl IntoIterator<Item = &'p str>,
    options: &TransformOptions,
) -> String {
    let mut props = Vec::new();
    if options.include_default_text {
        props.push(format!("defaultValue: {}", js_string(text)));
    }
    for (index, name) in params.into_iter().enumerate() {
        match options.arg_mode {
            ArgMode::Named => props.push(name.to_string()),
            ArgMode::Indexed => props.push(format!("\"{index}\": {name}")),
        }
    }

    let call = if props.is_empty() {
        format!("{}({})", options.translate_function, js_string(id))
    } else {
        format!(
            "{}({}, {{ {} }})",
            options.translate_function,
            js_string(id),
            props.join(", ")
        )
    };

    if options.debug_enabled() {
        format!("`⟦${{{call}}}⟧`")
    } else {
        call
    }
}

/// The translate function is already imported (as a value) from the
/// runtime module.
fn has_runtime_import(parsed: &ParsedSource, options: &TransformOptions) -> bool {
    parsed.module.body.iter().any(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            return false;
        };
        if import.type_only || import.src.value.as_str() != Some(options.import_source.as_str()) {
            return false;
        }
        import.specifiers.iter().any(|specifier| {
            matches!(
                specifier,
                ImportSpecifier::Named(named)
                    if !named.is_type_only
                        && named.local.sym == options.translate_function.as_str()
            )
        })
    })
}

/// Edit placing `statement` right after the directive prologue
/// (`"use client";` etc.), else after a shebang line, else at the top.
fn import_insertion(parsed: &ParsedSource, statement: &str) -> TextEdit {
    let code = parsed.code();
    let last_directive = parsed
        .module
        .body
        .iter()
        .map_while(|item| match item {
            ModuleItem::Stmt(Stmt::Expr(stmt)) if matches!(&*stmt.expr, Expr::Lit(Lit::Str(_))) => {
                Some(stmt.span)
            }
            _ => None,
        })
        .last();

    // Code may follow the last directive on the same line
    if let Some(span) = last_directive {
        return TextEdit::insert(parsed.offset(span.hi), format!("\n{statement}"));
    }

    let start = parsed.body_start();
    if parsed.module.shebang.is_none() {
        return TextEdit::insert(start, format!("{statement}\n"));
    }
    match code[start..].find('\n') {
        Some(idx) => TextEdit::insert(start + idx + 1, format!("{statement}\n")),
        None => TextEdit::insert(code.len(), format!("\n{statement}\n")),
    }
}

/// Edit adding the runtime import, or `None` if the file already has it.
pub fn import_edit(parsed: &ParsedSource, options: &TransformOptions) -> Option<TextEdit> {
    if has_runtime_import(parsed, options) {
        return None;
    }

    let statement = format!(
        "import {{ {} }} from {};",
        options.translate_function,
        js_string(&options.import_source)
    );
    Some(import_insertion(parsed, &statement))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use swc_common::SourceMap;

    use super::*;
    use crate::core::parsers::parse_source;

    fn parse(code: &str) -> ParsedSource {
        parse_source(
            code.to_string(),
            "messages.ts",
            Arc::new(SourceMap::default()),
        )
        .unwrap()
    }

    fn insert_import(code: &str) -> String {
        let parsed = parse(code);
        match import_edit(&parsed, &TransformOptions::default()) {
            Some(edit) => apply_edits(code, vec![edit]),
            None => code.to_string(),
        }
    }

    #[test]
    fn test_apply_edits_back_to_front() {
        let code = "aaa bbb ccc";
        let edits = vec![
            TextEdit::replace(0, 3, "x"),
            TextEdit::replace(8, 11, "zzzzz"),
            TextEdit::insert(4, ">"),
        ];
        assert_eq!(apply_edits(code, edits), "x >bbb zzzzz");
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("plain"), r#""plain""#);
        assert_eq!(js_string("say \"hi\"\n\\"), r#""say \"hi\"\n\\""#);
        assert_eq!(js_string("\u{1}"), r#""\u0001""#);
    }

    #[test]
    fn test_call_without_params() {
        let options = TransformOptions::default();
        assert_eq!(
            call_expression("efc007a393", "Save", [], &options),
            r#"translate("efc007a393")"#
        );
    }

    #[test]
    fn test_call_named_and_indexed() {
        let mut options = TransformOptions::default();
        assert_eq!(
            call_expression("id", "Hi {{a}} {{b}}", ["a", "b"], &options),
            r#"translate("id", { a, b })"#
        );

        options.arg_mode = ArgMode::Indexed;
        assert_eq!(
            call_expression("id", "Hi {{a}} {{b}}", ["a", "b"], &options),
            r#"translate("id", { "0": a, "1": b })"#
        );
    }

    #[test]
    fn test_call_with_default_text() {
        let options = TransformOptions {
            include_default_text: true,
            ..Default::default()
        };
        assert_eq!(
            call_expression("id", "Hello, {{name}}!", ["name"], &options),
            r#"translate("id", { defaultValue: "Hello, {{name}}!", name })"#
        );
    }

    #[test]
    fn test_default_text_without_params() {
        let options = TransformOptions {
            include_default_text: true,
            ..Default::default()
        };
        assert_eq!(
            call_expression("efc007a393", "Save", [], &options),
            r#"translate("efc007a393", { defaultValue: "Save" })"#
        );
    }

    #[test]
    fn test_debug_wrap_and_production_override() {
        let mut options = TransformOptions {
            debug: true,
            translate_function: "t".to_string(),
            ..Default::default()
        };
        assert_eq!(call_expression("id", "x", [], &options), "`⟦${t(\"id\")}⟧`");

        options.production = true;
        assert_eq!(call_expression("id", "x", [], &options), r#"t("id")"#);
    }

    #[test]
    fn test_import_at_top() {
        assert_eq!(
            insert_import("export const m = {};\n"),
            "import { translate } from \"@msgkey/runtime\";\nexport const m = {};\n"
        );
    }

    #[test]
    fn test_import_after_directives() {
        assert_eq!(
            insert_import("\"use client\";\n'use strict';\nexport const m = {};\n"),
            "\"use client\";\n'use strict';\nimport { translate } from \"@msgkey/runtime\";\nexport const m = {};\n"
        );
    }

    #[test]
    fn test_import_after_shebang() {
        assert_eq!(
            insert_import("#!/usr/bin/env node\nconst m = {};\n"),
            "#!/usr/bin/env node\nimport { translate } from \"@msgkey/runtime\";\nconst m = {};\n"
        );
    }

    #[test]
    fn test_import_after_inline_directive() {
        let output =
            insert_import("\"use client\"; export const m = {\n  hello: () => \"Hi\",\n};\n");
        assert_eq!(
            output,
            "\"use client\";\nimport { translate } from \"@msgkey/runtime\"; export const m = {\n  hello: () => \"Hi\",\n};\n"
        );
        assert!(parse_source(output, "messages.ts", Arc::new(SourceMap::default())).is_ok());
    }

    #[test]
    fn test_import_after_shebang_without_newline() {
        assert_eq!(
            insert_import("#!/usr/bin/env node"),
            "#!/usr/bin/env node\nimport { translate } from \"@msgkey/runtime\";\n"
        );
    }

    #[test]
    fn test_import_after_byte_order_mark() {
        assert_eq!(
            insert_import("\u{feff}export const m = {};\n"),
            "\u{feff}import { translate } from \"@msgkey/runtime\";\nexport const m = {};\n"
        );
    }

    #[test]
    fn test_import_not_duplicated() {
        let code = "import { translate } from \"@msgkey/runtime\";\nconst m = {};\n";
        assert_eq!(insert_import(code), code);
    }

    #[test]
    fn test_type_only_import_does_not_count() {
        let code = "import type { translate } from \"@msgkey/runtime\";\n";
        assert!(insert_import(code).contains("import { translate } from"));
    }
}
