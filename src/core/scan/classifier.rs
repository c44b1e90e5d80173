//! Message function detection.
//!
//! A message is an object property, object method, getter, or class method
//! whose body is a single literal-producing expression:
//!
//! ```ts
//! export const messages = {
//!   /** @context dialog */
//!   close: () => "Close",
//!   welcome(name: string) {
//!     return "Welcome back, {{name}}!";
//!   },
//!   footer: () => "All rights " + "reserved.",
//! };
//! ```
//!
//! Anything else (runtime interpolation, other expressions, several
//! statements, async or generator functions, destructured parameters) is
//! left alone. Matching is deliberately narrow: a false positive puts code
//! into the catalog.
//!
//! The classifier only reads the AST. It produces [`MessageCandidate`]s in
//! document order; recording and rewriting happen afterwards.

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BinaryOp, BlockStmt, BlockStmtOrExpr, ClassMethod, Expr, Function, Lit, MethodKind,
    Pat, Prop, ReturnStmt, Stmt, TsTypeAnn,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::docs::{MessageMetadata, SignatureParam, doc_comments_at, extract_metadata};
use crate::core::parsers::ParsedSource;

/// A message function found in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCandidate {
    /// Literal text (concatenation already folded).
    pub text: String,
    /// Span of the literal-producing expression; the only part rewritten.
    pub span: Span,
    pub metadata: MessageMetadata,
}

impl MessageCandidate {
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.metadata.parameters.iter().map(|p| p.name.as_str())
    }
}

/// Result of classifying one file.
#[derive(Debug, Default)]
pub struct ClassifyResult {
    pub candidates: Vec<MessageCandidate>,
    /// Matching functions skipped because of an opt-out tag.
    pub excluded: usize,
}

/// Function forms that can carry a message body.
#[derive(Clone, Copy)]
enum FunctionShape<'n> {
    Arrow(&'n ArrowExpr),
    Function(&'n Function),
    Getter(Option<&'n BlockStmt>),
}

impl<'n> FunctionShape<'n> {
    fn is_plain(&self) -> bool {
        match self {
            FunctionShape::Arrow(arrow) => !arrow.is_async && !arrow.is_generator,
            FunctionShape::Function(function) => !function.is_async && !function.is_generator,
            FunctionShape::Getter(_) => true,
        }
    }

    fn params(&self) -> Vec<&'n Pat> {
        match self {
            FunctionShape::Arrow(arrow) => arrow.params.iter().collect(),
            FunctionShape::Function(function) => function.params.iter().map(|p| &p.pat).collect(),
            FunctionShape::Getter(_) => Vec::new(),
        }
    }

    /// The single expression the function evaluates to, if it has that shape.
    fn body_expr(&self) -> Option<&'n Expr> {
        match self {
            FunctionShape::Arrow(arrow) => match &*arrow.body {
                BlockStmtOrExpr::Expr(expr) => Some(expr),
                BlockStmtOrExpr::BlockStmt(block) => single_return(block),
            },
            FunctionShape::Function(function) => function.body.as_ref().and_then(single_return),
            FunctionShape::Getter(body) => body.and_then(single_return),
        }
    }
}

/// `{ return <expr>; }` with nothing else in the block.
fn single_return(block: &BlockStmt) -> Option<&Expr> {
    match block.stmts.as_slice() {
        [Stmt::Return(ReturnStmt { arg: Some(arg), .. })] => Some(arg),
        _ => None,
    }
}

/// Text of a string literal or a template literal without substitutions.
fn single_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => match tpl.quasis.as_slice() {
            [quasi] => quasi
                .cooked
                .as_ref()
                .and_then(|cooked| cooked.as_str())
                .map(str::to_string),
            _ => None,
        },
        _ => None,
    }
}

/// Fold a literal or a left-associative `+` chain of literals.
pub fn literal_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Paren(paren) => literal_text(&paren.expr),
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            let mut text = literal_text(&bin.left)?;
            text.push_str(&single_literal(&bin.right)?);
            Some(text)
        }
        _ => single_literal(expr),
    }
}

pub struct MessageClassifier<'a> {
    parsed: &'a ParsedSource,
    result: ClassifyResult,
}

impl<'a> MessageClassifier<'a> {
    pub fn new(parsed: &'a ParsedSource) -> Self {
        Self {
            parsed,
            result: ClassifyResult::default(),
        }
    }

    /// Walk the whole module and return every candidate in document order.
    pub fn classify(parsed: &'a ParsedSource) -> ClassifyResult {
        let mut classifier = Self::new(parsed);
        parsed.module.visit_with(&mut classifier);
        classifier.result
    }

    /// Record `shape` as a candidate if its body and parameters qualify.
    ///
    /// `doc_positions` lists where documentation may be attached, outermost
    /// (the property) first.
    fn consider(&mut self, doc_positions: &[BytePos], shape: FunctionShape<'_>) {
        if !shape.is_plain() {
            return;
        }
        let Some(body) = shape.body_expr() else {
            return;
        };
        let Some(text) = literal_text(body) else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        let Some(params) = shape
            .params()
            .into_iter()
            .filter(|pat| !is_this_param(pat))
            .map(|pat| self.signature_param(pat))
            .collect::<Option<Vec<_>>>()
        else {
            return;
        };

        let docs = doc_comments_at(&self.parsed.comments, doc_positions);
        let metadata = extract_metadata(&docs, &params);
        if metadata.excluded {
            self.result.excluded += 1;
            return;
        }

        self.result.candidates.push(MessageCandidate {
            text,
            span: body.span(),
            metadata,
        });
    }

    /// Name and declared type of a simple parameter; `None` for patterns.
    fn signature_param(&self, pat: &Pat) -> Option<SignatureParam> {
        match pat {
            Pat::Ident(ident) => Some(SignatureParam::new(
                ident.id.sym.to_string(),
                self.type_text(ident.type_ann.as_deref()),
            )),
            Pat::Assign(assign) => match &*assign.left {
                Pat::Ident(ident) => Some(SignatureParam::new(
                    ident.id.sym.to_string(),
                    self.type_text(ident.type_ann.as_deref()),
                )),
                _ => None,
            },
            Pat::Rest(rest) => match &*rest.arg {
                Pat::Ident(ident) => Some(SignatureParam::new(
                    ident.id.sym.to_string(),
                    self.type_text(rest.type_ann.as_deref().or(ident.type_ann.as_deref())),
                )),
                _ => None,
            },
            _ => None,
        }
    }

    fn type_text(&self, ann: Option<&TsTypeAnn>) -> Option<String> {
        let ann = ann?;
        let text = self.parsed.snippet(ann.type_ann.span())?;
        Some(text.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// TypeScript's `this` parameter is a type annotation, not an argument.
fn is_this_param(pat: &Pat) -> bool {
    matches!(pat, Pat::Ident(ident) if ident.id.sym == "this")
}

impl Visit for MessageClassifier<'_> {
    fn visit_prop(&mut self, node: &Prop) {
        match node {
            Prop::KeyValue(kv) => {
                let shape = match &*kv.value {
                    Expr::Arrow(arrow) => Some(FunctionShape::Arrow(arrow)),
                    Expr::Fn(fn_expr) => Some(FunctionShape::Function(&fn_expr.function)),
                    _ => None,
                };
                if let Some(shape) = shape {
                    self.consider(&[kv.key.span().lo, kv.value.span().lo], shape);
                }
            }
            Prop::Method(method) => {
                self.consider(
                    &[method.key.span().lo, method.function.span.lo],
                    FunctionShape::Function(&method.function),
                );
            }
            Prop::Getter(getter) => {
                self.consider(
                    &[getter.span.lo, getter.key.span().lo],
                    FunctionShape::Getter(getter.body.as_ref()),
                );
            }
            _ => {}
        }

        // Nested objects inside skipped or unmatched functions still count
        node.visit_children_with(self);
    }

    fn visit_class_method(&mut self, node: &ClassMethod) {
        if matches!(node.kind, MethodKind::Method | MethodKind::Getter) {
            self.consider(
                &[node.span.lo, node.key.span().lo, node.function.span.lo],
                FunctionShape::Function(&node.function),
            );
        }
        node.visit_children_with(self);
    }
}
