//! Data model for destructuring lowering.
//!
//! Describes binding patterns as they appear in declarations and parameter
//! lists, the source expressions they read from, and the flat assignments
//! they lower to:
//! - `{x, y: [a, b]}` → [`BindingPattern::Object`]
//! - `[x, , ...rest]` → [`BindingPattern::Array`]
//! - `x = z.y`        → [`AssignmentOp`]

pub use swc_ecma_ast::Expr;

use serde::{Deserialize, Serialize};

/// A destructuring shape appearing where a plain identifier could be bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingPattern {
    Object(ObjectPattern),
    Array(ArrayPattern),
}

impl BindingPattern {
    /// Number of top-level members (properties or elements, skips included).
    pub fn len(&self) -> usize {
        match self {
            BindingPattern::Object(obj) => obj.properties.len(),
            BindingPattern::Array(arr) => arr.elements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `{key: target, ...}`, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPattern {
    pub properties: Vec<PatternProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternProperty {
    pub key: String,
    pub target: BindingTarget,
}

/// `[a, , b, ...rest]`, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayPattern {
    pub elements: Vec<ArrayElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayElement {
    /// An elided slot. Consumes one index and binds nothing.
    Skip,
    Target(BindingTarget),
    /// `...name`. Only valid as the last element.
    Rest(String),
}

/// What a single pattern member binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    Identifier(String),
    Pattern(BindingPattern),
}

/// One step of a synthesized access path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// `.name`
    Property(String),
    /// `[index]`
    Index(usize),
    /// `.slice(start)`
    SliceFrom(usize),
}

impl std::fmt::Display for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Property(name) => write!(f, ".{name}"),
            Accessor::Index(index) => write!(f, "[{index}]"),
            Accessor::SliceFrom(start) => write!(f, ".slice({start})"),
        }
    }
}

/// The value a pattern (or one of its members) reads from.
///
/// Identifiers and fragments are free to read repeatedly. Expressions and
/// composite paths may have side effects and are read at most once.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceExpr {
    Identifier(String),
    Fragment(Accessor),
    Expr(Box<Expr>),
    /// A base followed by fragments, e.g. `z` `.x` `[0]`.
    Path(Vec<SourceExpr>),
}

impl SourceExpr {
    /// Wrap a parsed expression, unwrapping bare identifiers so they can be
    /// reused without caching.
    pub fn from_expr(expr: Box<Expr>) -> Self {
        match *expr {
            Expr::Ident(ident) => SourceExpr::Identifier(ident.sym.to_string()),
            other => SourceExpr::Expr(Box::new(other)),
        }
    }

    /// Extend this source with one more access step.
    pub fn member(self, accessor: Accessor) -> Self {
        match self {
            SourceExpr::Path(mut parts) => {
                parts.push(SourceExpr::Fragment(accessor));
                SourceExpr::Path(parts)
            }
            base => SourceExpr::Path(vec![base, SourceExpr::Fragment(accessor)]),
        }
    }

    /// True for sources that can be read any number of times without
    /// re-evaluating anything.
    pub fn is_reusable(&self) -> bool {
        matches!(self, SourceExpr::Identifier(_) | SourceExpr::Fragment(_))
    }
}

/// `target = value`, one binding produced by lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentOp {
    pub target: String,
    pub value: SourceExpr,
}

impl AssignmentOp {
    pub fn new(target: impl Into<String>, value: SourceExpr) -> Self {
        Self {
            target: target.into(),
            value,
        }
    }
}

/// Options controlling what gets lowered and how temporaries are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LowerConfig {
    /// Prefix for temporaries caching an effectful source, `var$0`.
    pub temp_prefix: String,
    /// Prefix for placeholders replacing pattern parameters, `arg$0`.
    pub param_prefix: String,
    /// Lower pattern declarations (`var {x} = y`).
    pub declarations: bool,
    /// Hoist pattern parameters (`function f({x}) {}`).
    pub parameters: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            temp_prefix: "var".to_string(),
            param_prefix: "arg".to_string(),
            declarations: true,
            parameters: true,
        }
    }
}
