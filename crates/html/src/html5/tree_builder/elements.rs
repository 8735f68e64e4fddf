//! Per-element HTML rules the builder consults.

use crate::html5::tokenizer::ContentModel;

pub(crate) fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Content model the tokenizer must use for the children of `name`, when it
/// is not `Data`.
pub(crate) fn content_model_for(name: &str) -> Option<ContentModel> {
    match name {
        "script" => Some(ContentModel::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(ContentModel::RawText),
        "title" | "textarea" => Some(ContentModel::RcData),
        "plaintext" => Some(ContentModel::PlainText),
        _ => None,
    }
}

/// Elements that bound the HTML "in scope" search for end tags.
pub(crate) fn is_scope_boundary(name: &str) -> bool {
    matches!(
        name,
        "html"
            | "table"
            | "template"
            | "td"
            | "th"
            | "caption"
            | "marquee"
            | "object"
            | "applet"
    )
}
