//! Command catalog for the math preview
//!
//! Every supported backslash command maps to either an upright function name,
//! an enlarged operator glyph, or a single Unicode symbol.

use phf::{phf_map, phf_set};

/// Rendered upright, without the backslash
pub static FUNCTIONS: phf::Set<&'static str> = phf_set! {
    "sin", "cos", "tan", "arcsin", "arccos", "arctan", "sinh", "cosh",
    "log", "ln", "lim",
};

/// Rendered enlarged
pub static BIG_OPERATORS: phf::Map<&'static str, char> = phf_map! {
    "sum" => '∑',
    "prod" => '∏',
    "int" => '∫',
    "oint" => '∮',
    "iint" => '∬',
    "iiint" => '∭',
};

pub static SYMBOLS: phf::Map<&'static str, char> = phf_map! {
    // calculus
    "to" => '→',
    "nabla" => '∇',
    "partial" => '∂',
    "Delta" => 'Δ',
    // comparisons
    "leq" => '≤',
    "geq" => '≥',
    "neq" => '≠',
    "ll" => '≪',
    "gg" => '≫',
    "approx" => '≈',
    "equiv" => '≡',
    "sim" => '∼',
    "propto" => '∝',
    // operations
    "pm" => '±',
    "mp" => '∓',
    "times" => '×',
    "div" => '÷',
    "cdot" => '⋅',
    // greek
    "alpha" => 'α',
    "beta" => 'β',
    "gamma" => 'γ',
    "delta" => 'δ',
    "epsilon" => 'ε',
    "zeta" => 'ζ',
    "eta" => 'η',
    "theta" => 'θ',
    "iota" => 'ι',
    "kappa" => 'κ',
    "lambda" => 'λ',
    "mu" => 'μ',
    "nu" => 'ν',
    "xi" => 'ξ',
    "pi" => 'π',
    "rho" => 'ρ',
    "sigma" => 'σ',
    "tau" => 'τ',
    "phi" => 'φ',
    "chi" => 'χ',
    "psi" => 'ψ',
    "omega" => 'ω',
    // sets, logic, arrows
    "infty" => '∞',
    "emptyset" => '∅',
    "in" => '∈',
    "notin" => '∉',
    "subset" => '⊂',
    "supset" => '⊃',
    "cup" => '∪',
    "cap" => '∩',
    "forall" => '∀',
    "exists" => '∃',
    "nexists" => '∄',
    "rightarrow" => '→',
    "leftarrow" => '←',
    "leftrightarrow" => '↔',
    "Rightarrow" => '⇒',
    "Leftrightarrow" => '⇔',
};

/// Single-character escapes that stand for the literal character (`\%`, `\{`)
pub fn escaped_literal(name: &str) -> Option<char> {
    match name {
        "%" | "{" | "}" | "$" | "&" | "#" | "_" => name.chars().next(),
        _ => None,
    }
}

/// Unicode superscript form of a character, if one exists
pub fn superscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        _ => return None,
    })
}

/// Unicode subscript form of a character, if one exists
pub fn subscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'i' => 'ᵢ',
        'n' => 'ₙ',
        'x' => 'ₓ',
        _ => return None,
    })
}
