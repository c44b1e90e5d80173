use super::comment::DocComment;
use crate::core::store::ParameterMeta;

/// Type recorded for parameters without any declared type.
pub const UNTYPED_PARAMETER: &str = "any";

/// A parameter as declared in the function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParam {
    pub name: String,
    /// Type annotation source text, if any.
    pub ty: Option<String>,
}

impl SignatureParam {
    pub fn new(name: impl Into<String>, ty: Option<String>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Everything the docs and signature say about one message function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageMetadata {
    pub context: Option<String>,
    pub parameters: Vec<ParameterMeta>,
    /// Free-text translator notes, one per documentation block.
    pub notes: Vec<String>,
    /// An opt-out tag was present.
    pub excluded: bool,
}

/// Combine documentation blocks (outermost first) with the signature.
///
/// Parameters always come from the signature; documentation only adds
/// descriptions and fills in types that the signature leaves out.
pub fn extract_metadata(docs: &[DocComment], params: &[SignatureParam]) -> MessageMetadata {
    let context = docs
        .iter()
        .find_map(|doc| doc.context())
        .map(str::to_string);

    let notes = docs.iter().filter_map(DocComment::note).collect();

    let parameters = params
        .iter()
        .map(|param| {
            let documented = docs.iter().find_map(|doc| doc.param(&param.name));
            let ty = param
                .ty
                .clone()
                .or_else(|| documented.and_then(|d| d.ty.clone()))
                .unwrap_or_else(|| UNTYPED_PARAMETER.to_string());
            ParameterMeta {
                name: param.name.clone(),
                ty,
                description: documented.and_then(|d| d.description.clone()),
            }
        })
        .collect();

    MessageMetadata {
        context,
        parameters,
        notes,
        excluded: docs.iter().any(DocComment::is_excluded),
    }
}
