//! Expression tree produced by the math parser

/// A node of a parsed formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathNode {
    /// Sequence of nodes rendered side by side
    Row(Vec<MathNode>),
    /// Literal characters (variables, digits, ASCII operators, spaces)
    Text(String),
    /// A command replaced by one Unicode character (`\alpha`, `\leq`)
    Symbol(char),
    /// An upright function name (`\sin` → `sin`)
    Function(&'static str),
    /// Enlarged operator glyph (`\sum`, `\int`)
    BigOperator(char),
    Fraction {
        numerator: Box<MathNode>,
        denominator: Box<MathNode>,
    },
    Sqrt {
        index: Option<Box<MathNode>>,
        radicand: Box<MathNode>,
    },
    /// Raised script attached to whatever precedes it
    Superscript(Box<MathNode>),
    /// Lowered script attached to whatever precedes it
    Subscript(Box<MathNode>),
    /// Input the parser could not interpret, kept verbatim
    Raw(String),
}

impl MathNode {
    pub fn text(s: impl Into<String>) -> Self {
        MathNode::Text(s.into())
    }

    pub fn fraction(numerator: MathNode, denominator: MathNode) -> Self {
        MathNode::Fraction {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        }
    }

    pub fn sqrt(index: Option<MathNode>, radicand: MathNode) -> Self {
        MathNode::Sqrt {
            index: index.map(Box::new),
            radicand: Box::new(radicand),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MathNode::Row(children) => children.iter().all(MathNode::is_empty),
            MathNode::Text(s) | MathNode::Raw(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Whether any part of the input was left uninterpreted
    pub fn has_raw(&self) -> bool {
        match self {
            MathNode::Raw(_) => true,
            MathNode::Row(children) => children.iter().any(MathNode::has_raw),
            MathNode::Fraction {
                numerator,
                denominator,
            } => numerator.has_raw() || denominator.has_raw(),
            MathNode::Sqrt { index, radicand } => {
                index.as_ref().is_some_and(|i| i.has_raw()) || radicand.has_raw()
            }
            MathNode::Superscript(inner) | MathNode::Subscript(inner) => inner.has_raw(),
            _ => false,
        }
    }
}
