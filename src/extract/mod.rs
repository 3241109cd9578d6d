//! Animation extraction from embedded CSS and SMIL elements.
//!
//! Both passes produce [`AnimationDescriptor`]s; CSS descriptors come first, then SMIL ones in
//! document order.

use crate::animation::model::AnimationDescriptor;
use crate::document::tree::Document;
use crate::foundation::error::SvgifResult;

/// Clock and time value parsing.
pub mod clock;
/// `@keyframes` and `animation` rules.
pub mod css;
/// `<animate>`, `<animateTransform>`, `<animateMotion>` and `<set>`.
pub mod smil;
/// Regeneration of CSS and SMIL markup from descriptors.
pub mod unparse;

pub use css::extract_css;
pub use smil::extract_smil;

/// Parse `markup` and extract every animation it declares.
#[tracing::instrument(skip_all, fields(len = markup.len()))]
pub fn extract(markup: &str) -> SvgifResult<Vec<AnimationDescriptor>> {
    let doc = Document::parse(markup)?;
    Ok(extract_document(&doc))
}

/// Extract animations from an already parsed document.
pub fn extract_document(doc: &Document) -> Vec<AnimationDescriptor> {
    let mut out = extract_css(&doc.style_sheet_text());
    let css_count = out.len();
    out.extend(extract_smil(doc));
    tracing::debug!(css = css_count, smil = out.len() - css_count, "extracted animations");
    out
}
