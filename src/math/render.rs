//! Renderers for parsed formulas
//!
//! `render_html` is the on-screen preview (inline styles, no stylesheet);
//! `render_plain` is the Unicode-only form used by text exports.

use super::model::MathNode;
use super::symbols::{subscript_char, superscript_char};

const WRAPPER_OPEN: &str =
    "<span style=\"font-family: 'Times New Roman', serif; font-size: 1.1em; color: #374151;\">";

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

fn write_html(node: &MathNode, out: &mut String) {
    match node {
        MathNode::Row(children) => children.iter().for_each(|child| write_html(child, out)),
        MathNode::Text(text) | MathNode::Raw(text) => escape_html(text, out),
        MathNode::Symbol(c) => out.push(*c),
        MathNode::Function(name) => out.push_str(name),
        MathNode::BigOperator(c) => {
            out.push_str("<span style=\"font-size: 1.4em;\">");
            out.push(*c);
            out.push_str("</span>");
        }
        MathNode::Fraction {
            numerator,
            denominator,
        } => {
            out.push_str("<span style=\"display: inline-block; vertical-align: middle; text-align: center; margin: 0 0.1em;\">");
            out.push_str("<span style=\"display: block; font-size: 0.8em; border-bottom: 1px solid; padding-bottom: 0.1em;\">");
            write_html(numerator, out);
            out.push_str("</span><span style=\"display: block; font-size: 0.8em; padding-top: 0.1em;\">");
            write_html(denominator, out);
            out.push_str("</span></span>");
        }
        MathNode::Sqrt { index, radicand } => {
            if let Some(index) = index {
                out.push_str("<span style=\"position: relative;\"><sup style=\"font-size: 0.6em; position: absolute; top: -0.5em; left: -0.3em;\">");
                write_html(index, out);
                out.push_str("</sup>√<span style=\"border-top: 1px solid; padding-top: 0.1em;\">");
                write_html(radicand, out);
                out.push_str("</span></span>");
            } else {
                out.push_str("√<span style=\"border-top: 1px solid; padding-top: 0.1em;\">");
                write_html(radicand, out);
                out.push_str("</span>");
            }
        }
        MathNode::Superscript(inner) => {
            out.push_str("<sup style=\"font-size: 0.75em;\">");
            write_html(inner, out);
            out.push_str("</sup>");
        }
        MathNode::Subscript(inner) => {
            out.push_str("<sub style=\"font-size: 0.75em;\">");
            write_html(inner, out);
            out.push_str("</sub>");
        }
    }
}

/// HTML preview fragment wrapped in the serif span
pub fn render_html(tree: &MathNode) -> String {
    let mut out = String::from(WRAPPER_OPEN);
    write_html(tree, &mut out);
    out.push_str("</span>");
    out
}

/// Whether a node renders to a single "atom" that needs no parentheses
fn is_atomic(text: &str) -> bool {
    text.chars().count() == 1 || text.chars().all(|c| c.is_alphanumeric())
}

fn scripted(inner: &str, map: fn(char) -> Option<char>, marker: char) -> String {
    if let Some(mapped) = inner.chars().map(map).collect::<Option<String>>() {
        if !mapped.is_empty() {
            return mapped;
        }
    }
    if inner.chars().count() == 1 {
        format!("{}{}", marker, inner)
    } else {
        format!("{}({})", marker, inner)
    }
}

fn write_plain(node: &MathNode, out: &mut String) {
    match node {
        MathNode::Row(children) => children.iter().for_each(|child| write_plain(child, out)),
        MathNode::Text(text) | MathNode::Raw(text) => out.push_str(text),
        MathNode::Symbol(c) | MathNode::BigOperator(c) => out.push(*c),
        MathNode::Function(name) => out.push_str(name),
        MathNode::Fraction {
            numerator,
            denominator,
        } => {
            let num = render_plain(numerator);
            let den = render_plain(denominator);
            let wrap = |s: &str| {
                if is_atomic(s) {
                    s.to_string()
                } else {
                    format!("({})", s)
                }
            };
            out.push_str(&format!("{}/{}", wrap(&num), wrap(&den)));
        }
        MathNode::Sqrt { index, radicand } => {
            if let Some(index) = index {
                out.push_str(&scripted(&render_plain(index), superscript_char, '^'));
            }
            let inner = render_plain(radicand);
            if is_atomic(&inner) {
                out.push_str(&format!("√{}", inner));
            } else {
                out.push_str(&format!("√({})", inner));
            }
        }
        MathNode::Superscript(inner) => {
            out.push_str(&scripted(&render_plain(inner), superscript_char, '^'))
        }
        MathNode::Subscript(inner) => {
            out.push_str(&scripted(&render_plain(inner), subscript_char, '_'))
        }
    }
}

/// Unicode-only rendition
pub fn render_plain(tree: &MathNode) -> String {
    let mut out = String::new();
    write_plain(tree, &mut out);
    out
}
