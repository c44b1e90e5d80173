use std::sync::Arc;

use swc_common::SourceMap;

use super::classifier::MessageClassifier;
use super::rewrite::{TextEdit, apply_edits, call_expression, import_edit};
use crate::core::context::{MessageRecorder, RecordedMessage};
use crate::core::options::TransformOptions;
use crate::core::parsers::{ParsedSource, parse_source};
use crate::core::store::SourceRef;
use crate::error::Result;

/// Result of transforming one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// At least one message was rewritten.
    pub did_transform: bool,
    /// Messages rewritten in this file.
    pub messages: usize,
    /// Message functions skipped because of an opt-out tag.
    pub excluded: usize,
}

/// Parse, record and rewrite a single source file.
///
/// Every message found is passed to `recorder` in document order; the id it
/// returns is what the rewritten call looks up. Files without messages are
/// returned unchanged.
pub fn transform<R>(
    source: &str,
    file_path: &str,
    options: &TransformOptions,
    recorder: &mut R,
) -> Result<TransformOutput>
where
    R: MessageRecorder + ?Sized,
{
    let parsed = parse_source(
        source.to_string(),
        file_path,
        Arc::new(SourceMap::default()),
    )?;
    transform_parsed(&parsed, options, recorder)
}

/// Like [`transform`] for a file that is already parsed.
pub fn transform_parsed<R>(
    parsed: &ParsedSource,
    options: &TransformOptions,
    recorder: &mut R,
) -> Result<TransformOutput>
where
    R: MessageRecorder + ?Sized,
{
    let classified = MessageClassifier::classify(parsed);

    let mut edits = Vec::with_capacity(classified.candidates.len() + 1);
    for candidate in &classified.candidates {
        let (line, col) = parsed.line_col(candidate.span.lo);
        let id = recorder.record(RecordedMessage {
            text: candidate.text.clone(),
            context: candidate.metadata.context.clone(),
            source_ref: SourceRef::new(parsed.file_path.clone(), line, col),
            notes: candidate.metadata.notes.clone(),
            parameters: candidate.metadata.parameters.clone(),
        })?;

        edits.push(TextEdit::replace(
            parsed.offset(candidate.span.lo),
            parsed.offset(candidate.span.hi),
            call_expression(&id, &candidate.text, candidate.parameter_names(), options),
        ));
    }

    let messages = edits.len();
    if messages == 0 {
        return Ok(TransformOutput {
            code: parsed.code().to_string(),
            did_transform: false,
            messages,
            excluded: classified.excluded,
        });
    }

    if let Some(edit) = import_edit(parsed, options) {
        edits.push(edit);
    }

    Ok(TransformOutput {
        code: apply_edits(parsed.code(), edits),
        did_transform: true,
        messages,
        excluded: classified.excluded,
    })
}
