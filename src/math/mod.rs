//! Math-notation preview
//!
//! Turns the editor's backslash-command markup (fractions, scripts, roots,
//! function names, operators, Greek letters) into an inline-styled HTML
//! fragment for on-screen preview, or into plain Unicode text for exports.
//! Best effort: anything not understood is shown as typed.

pub mod model;
pub mod parser;
pub mod render;
pub mod symbols;

pub use model::MathNode;
pub use parser::parse;

/// Render markup as an HTML preview fragment
///
/// Blank input renders as an empty string.
pub fn render_html(latex: &str) -> String {
    if latex.trim().is_empty() {
        return String::new();
    }
    render::render_html(&parse(latex))
}

/// Render markup as plain Unicode text
pub fn to_plain_text(latex: &str) -> String {
    render::render_plain(&parse(latex))
}
