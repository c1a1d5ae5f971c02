//! Shared rendering rules: precedence table, parenthesization, escaping

use super::Node;
use crate::options::{Parenthesis, RenderOptions};

/// Output notation for a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notation {
    Text,
    Tex,
    Html,
}

// Lower binds looser.
pub(crate) const PRECEDENCE_CONTROL: u8 = 0;
pub(crate) const PRECEDENCE_OR: u8 = 1;
pub(crate) const PRECEDENCE_AND: u8 = 2;
pub(crate) const PRECEDENCE_RELATIONAL: u8 = 3;
pub(crate) const PRECEDENCE_ADDITIVE: u8 = 4;
pub(crate) const PRECEDENCE_MULTIPLICATIVE: u8 = 5;
pub(crate) const PRECEDENCE_UNARY: u8 = 6;
pub(crate) const PRECEDENCE_POW: u8 = 7;

/// Precedence of the operator implemented by `fn_name`.
pub(crate) fn operator_precedence(fn_name: &str) -> Option<u8> {
    match fn_name {
        "or" => Some(PRECEDENCE_OR),
        "and" => Some(PRECEDENCE_AND),
        "equal" | "unequal" | "smaller" | "larger" | "smallerEq" | "largerEq" => {
            Some(PRECEDENCE_RELATIONAL)
        }
        "add" | "subtract" => Some(PRECEDENCE_ADDITIVE),
        "multiply" | "divide" | "mod" => Some(PRECEDENCE_MULTIPLICATIVE),
        "unaryMinus" | "unaryPlus" | "not" => Some(PRECEDENCE_UNARY),
        "pow" => Some(PRECEDENCE_POW),
        _ => None,
    }
}

/// Conservative rule shared by assignment values and conditions: wrap when
/// everything is parenthesized, or when the child binds no tighter than
/// its parent.
pub(crate) fn needs_parens_loose(child: &Node, parent_precedence: u8, options: &RenderOptions) -> bool {
    match options.parenthesis {
        Parenthesis::All => true,
        Parenthesis::Keep => child
            .precedence(options.parenthesis)
            .is_some_and(|p| p <= parent_precedence),
    }
}

/// Wrap rendered text in round parentheses for the given notation.
pub(crate) fn parens(inner: &str, notation: Notation) -> String {
    match notation {
        Notation::Text => format!("({})", inner),
        Notation::Tex => format!("\\left({}\\right)", inner),
        Notation::Html => format!(
            "<span class=\"math-parenthesis math-round-parenthesis\">(</span>{}\
             <span class=\"math-parenthesis math-round-parenthesis\">)</span>",
            inner
        ),
    }
}

/// Indent every continuation line of a nested block by one tab.
pub(crate) fn indent(text: &str) -> String {
    text.replace('\n', "\n\t")
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
