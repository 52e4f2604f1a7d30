//! Math markup parser
//!
//! Parses the backslash-command subset used by the question editor into a
//! [`MathNode`] tree. The parser never fails: unknown commands, missing
//! arguments and unbalanced braces come back as [`MathNode::Raw`] so the
//! preview shows what the teacher typed. Braces are matched once up front;
//! groups nested past [`MAX_NESTING`] are kept as raw source.

use super::model::MathNode;
use super::symbols::{escaped_literal, BIG_OPERATORS, FUNCTIONS, SYMBOLS};

// =============================================================================
// Tokenizer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Any character without special meaning
    Char(char),
    /// `\name` or `\` followed by one non-letter
    Command(String),
    Open,
    Close,
    OpenBracket,
    CloseBracket,
    Caret,
    Underscore,
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let token = match c {
            '\\' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphabetic() {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    match chars.next() {
                        Some(next) => name.push(next),
                        // trailing lone backslash
                        None => {
                            tokens.push(Token::Char('\\'));
                            break;
                        }
                    }
                }
                Token::Command(name)
            }
            '{' => Token::Open,
            '}' => Token::Close,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '^' => Token::Caret,
            '_' => Token::Underscore,
            other => Token::Char(other),
        };
        tokens.push(token);
    }

    tokens
}

fn token_source(token: &Token) -> String {
    match token {
        Token::Char(c) => c.to_string(),
        Token::Command(name) => format!("\\{}", name),
        Token::Open => "{".to_string(),
        Token::Close => "}".to_string(),
        Token::OpenBracket => "[".to_string(),
        Token::CloseBracket => "]".to_string(),
        Token::Caret => "^".to_string(),
        Token::Underscore => "_".to_string(),
    }
}

/// For every `{`, the index of its matching `}`
fn match_braces(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut close_of = vec![None; tokens.len()];
    let mut open = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Open => open.push(i),
            Token::Close => {
                if let Some(start) = open.pop() {
                    close_of[start] = Some(i);
                }
            }
            _ => {}
        }
    }
    close_of
}

// =============================================================================
// Parser
// =============================================================================

/// Groups nested deeper than this are kept as raw source
pub const MAX_NESTING: usize = 32;

struct Parser {
    tokens: Vec<Token>,
    close_of: Vec<Option<usize>>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        let tokens = tokenize(input);
        let close_of = match_braces(&tokens);
        Self {
            tokens,
            close_of,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Index of the `}` closing a `{` at `at`
    fn group_end(&self, at: usize) -> Option<usize> {
        match self.tokens.get(at) {
            Some(Token::Open) => self.close_of.get(at).copied().flatten(),
            _ => None,
        }
    }

    /// Parse tokens up to (not including) `end`
    fn parse_row(&mut self, end: usize) -> Vec<MathNode> {
        let mut nodes: Vec<MathNode> = Vec::new();

        while self.pos < end {
            let Some(token) = self.next() else {
                break;
            };
            let node = match token {
                Token::Close => MathNode::Raw("}".to_string()),
                Token::Char(c) => {
                    push_text(&mut nodes, c);
                    continue;
                }
                Token::OpenBracket => {
                    push_text(&mut nodes, '[');
                    continue;
                }
                Token::CloseBracket => {
                    push_text(&mut nodes, ']');
                    continue;
                }
                Token::Open => match self.parse_group(self.pos - 1) {
                    Some(group) => group,
                    None => MathNode::Raw("{".to_string()),
                },
                Token::Caret => match self.parse_script_arg() {
                    Some(arg) => MathNode::Superscript(Box::new(arg)),
                    None => MathNode::Raw("^".to_string()),
                },
                Token::Underscore => match self.parse_script_arg() {
                    Some(arg) => MathNode::Subscript(Box::new(arg)),
                    None => MathNode::Raw("_".to_string()),
                },
                Token::Command(name) => self.parse_command(&name),
            };
            nodes.push(node);
        }

        nodes
    }

    /// The `{...}` group opened at `open`; on success `pos` is left after its `}`
    ///
    /// `None` when the brace is never closed, and nothing is consumed.
    fn parse_group(&mut self, open: usize) -> Option<MathNode> {
        let close = self.group_end(open)?;
        let node = if self.depth >= MAX_NESTING {
            MathNode::Raw(self.tokens[open..=close].iter().map(token_source).collect())
        } else {
            self.pos = open + 1;
            self.depth += 1;
            let nodes = self.parse_row(close);
            self.depth -= 1;
            collapse(nodes)
        };
        self.pos = close + 1;
        Some(node)
    }

    /// A mandatory `{...}` argument at the current position
    fn parse_brace_arg(&mut self) -> Option<MathNode> {
        let open = self.pos;
        self.parse_group(open)
    }

    /// An optional `[...]` argument holding plain characters only
    fn parse_bracket_arg(&mut self) -> Option<MathNode> {
        let start = self.pos;
        if self.peek() != Some(&Token::OpenBracket) {
            return None;
        }
        self.next();

        let mut text = String::new();
        while let Some(token) = self.next() {
            match token {
                Token::CloseBracket => return Some(MathNode::Text(text)),
                Token::Char(c) => text.push(c),
                _ => break,
            }
        }
        self.pos = start;
        None
    }

    /// Argument of `^`/`_`: a braced group or a single character/command
    fn parse_script_arg(&mut self) -> Option<MathNode> {
        match self.peek()? {
            Token::Open => self.parse_brace_arg(),
            Token::Char(c) if !c.is_whitespace() => {
                let c = *c;
                self.next();
                Some(MathNode::Text(c.to_string()))
            }
            Token::Command(_) => {
                let Some(Token::Command(name)) = self.next() else {
                    return None;
                };
                Some(self.parse_command(&name))
            }
            _ => None,
        }
    }

    fn parse_command(&mut self, name: &str) -> MathNode {
        match name {
            "frac" => {
                // both arguments must be complete before either is consumed
                let complete = self
                    .group_end(self.pos)
                    .and_then(|end| self.group_end(end + 1))
                    .is_some();
                if !complete {
                    return MathNode::Raw("\\frac".to_string());
                }
                match (self.parse_brace_arg(), self.parse_brace_arg()) {
                    (Some(numerator), Some(denominator)) => {
                        MathNode::fraction(numerator, denominator)
                    }
                    _ => MathNode::Raw("\\frac".to_string()),
                }
            }
            "sqrt" => {
                let start = self.pos;
                let index = self.parse_bracket_arg();
                match self.parse_brace_arg() {
                    Some(radicand) => MathNode::sqrt(index, radicand),
                    None => {
                        self.pos = start;
                        MathNode::Raw("\\sqrt".to_string())
                    }
                }
            }
            _ => {
                if let Some(&function) = FUNCTIONS.get_key(name) {
                    MathNode::Function(function)
                } else if let Some(&glyph) = BIG_OPERATORS.get(name) {
                    MathNode::BigOperator(glyph)
                } else if let Some(&symbol) = SYMBOLS.get(name) {
                    MathNode::Symbol(symbol)
                } else if let Some(literal) = escaped_literal(name) {
                    MathNode::Text(literal.to_string())
                } else {
                    MathNode::Raw(token_source(&Token::Command(name.to_string())))
                }
            }
        }
    }
}

/// Append a character, merging into a trailing `Text` node
fn push_text(nodes: &mut Vec<MathNode>, c: char) {
    if let Some(MathNode::Text(text)) = nodes.last_mut() {
        text.push(c);
    } else {
        nodes.push(MathNode::Text(c.to_string()));
    }
}

fn collapse(mut nodes: Vec<MathNode>) -> MathNode {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        MathNode::Row(nodes)
    }
}

/// Parse math markup into a tree
pub fn parse(input: &str) -> MathNode {
    let mut parser = Parser::new(input);
    let end = parser.tokens.len();
    MathNode::Row(parser.parse_row(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn children(node: MathNode) -> Vec<MathNode> {
        match node {
            MathNode::Row(children) => children,
            other => vec![other],
        }
    }

    #[test]
    fn test_fraction_with_nested_fraction() {
        let nodes = children(parse(r"\frac{\frac{1}{2}}{3}"));
        assert_eq!(
            nodes,
            vec![MathNode::fraction(
                MathNode::fraction(MathNode::text("1"), MathNode::text("2")),
                MathNode::text("3"),
            )]
        );
    }

    #[test]
    fn test_sqrt_with_index() {
        let nodes = children(parse(r"\sqrt[3]{x}"));
        assert_eq!(
            nodes,
            vec![MathNode::sqrt(Some(MathNode::text("3")), MathNode::text("x"))]
        );
    }

    #[test]
    fn test_scripts_braced_and_single() {
        let nodes = children(parse("x^{2}+a_i"));
        assert_eq!(
            nodes,
            vec![
                MathNode::text("x"),
                MathNode::Superscript(Box::new(MathNode::text("2"))),
                MathNode::text("+a"),
                MathNode::Subscript(Box::new(MathNode::text("i"))),
            ]
        );
    }

    #[test]
    fn test_longest_command_name_wins() {
        // \infty must not be read as \in + fty, nor \sinh as \sin + h
        let nodes = children(parse(r"\infty \sinh \notin"));
        assert_eq!(nodes[0], MathNode::Symbol('∞'));
        assert_eq!(nodes[2], MathNode::Function("sinh"));
        assert_eq!(nodes[4], MathNode::Symbol('∉'));
    }

    #[test]
    fn test_unknown_command_kept_raw() {
        let tree = parse(r"\foo + 1");
        assert!(tree.has_raw());
        assert_eq!(children(tree)[0], MathNode::Raw("\\foo".to_string()));
    }

    #[test]
    fn test_frac_missing_argument_falls_back() {
        let nodes = children(parse(r"\frac{1}"));
        assert_eq!(nodes[0], MathNode::Raw("\\frac".to_string()));
        assert_eq!(nodes[1], MathNode::text("1"));
    }

    #[test]
    fn test_unbalanced_brace_kept_raw() {
        let nodes = children(parse("{x"));
        assert_eq!(nodes, vec![MathNode::Raw("{".to_string()), MathNode::text("x")]);

        let nodes = children(parse("x}"));
        assert_eq!(nodes, vec![MathNode::text("x"), MathNode::Raw("}".to_string())]);
    }

    #[test]
    fn test_escaped_percent_and_trailing_backslash() {
        let nodes = children(parse(r"50\%"));
        assert_eq!(nodes, vec![MathNode::text("50"), MathNode::text("%")]);

        let nodes = children(parse("a\\"));
        assert_eq!(nodes, vec![MathNode::text("a\\")]);
    }

    #[test]
    fn test_brace_matching_skips_unmatched() {
        let tokens = tokenize("{a{b}");
        assert_eq!(match_braces(&tokens), vec![None, None, Some(4), None, None]);
    }

    #[test]
    fn test_nested_unclosed_group_keeps_inner_group() {
        let nodes = children(parse("{a{b}"));
        assert_eq!(
            nodes,
            vec![MathNode::Raw("{".to_string()), MathNode::text("a"), MathNode::text("b")]
        );
    }

    #[test]
    fn test_long_runs_of_broken_markup_parse_quickly() {
        let start = std::time::Instant::now();

        let nodes = children(parse(&"{".repeat(10_000)));
        assert_eq!(nodes.len(), 10_000);
        assert!(nodes.iter().all(|n| *n == MathNode::Raw("{".to_string())));

        let nodes = children(parse(&r"\frac{".repeat(5_000)));
        assert_eq!(nodes.len(), 10_000);
        assert_eq!(nodes[0], MathNode::Raw("\\frac".to_string()));
        assert_eq!(nodes[1], MathNode::Raw("{".to_string()));

        let nodes = children(parse(&r"\sqrt[".repeat(5_000)));
        assert_eq!(nodes[0], MathNode::Raw("\\sqrt".to_string()));
        assert_eq!(nodes[1], MathNode::text("["));

        // first argument present, second missing, at every level
        let nested = format!("{}x{}", r"\frac{".repeat(2_000), "}".repeat(2_000));
        let tree = parse(&nested);
        assert!(tree.has_raw());

        assert!(start.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_nesting_at_cap_is_parsed() {
        let input = format!("{}x{}", "{".repeat(MAX_NESTING), "}".repeat(MAX_NESTING));
        assert_eq!(children(parse(&input)), vec![MathNode::text("x")]);
    }

    #[test]
    fn test_nesting_past_cap_kept_raw() {
        let depth = MAX_NESTING + 3;
        let input = format!("{}x^2{}", "{".repeat(depth), "}".repeat(depth));
        let raw = format!("{}x^2{}", "{".repeat(3), "}".repeat(3));
        assert_eq!(children(parse(&input)), vec![MathNode::Raw(raw)]);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let input = format!("{}x{}", "{".repeat(200_000), "}".repeat(200_000));
        let tree = parse(&input);
        assert!(tree.has_raw());
    }
}
