//! Integer-element algebra: the literal/symbol expressions that appear as
//! Instance arguments, size overrides, and vector bounds (§3.1, §11.1).

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A binary operator over [`IntElement`]s. `^` is exponentiation, not XOR,
/// and is right-associative in the surface grammar (§6.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntOp {
    Add,
    Sub,
    Mul,
    Pow,
}

impl IntOp {
    fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            IntOp::Add => lhs.checked_add(rhs),
            IntOp::Sub => lhs.checked_sub(rhs),
            IntOp::Mul => lhs.checked_mul(rhs),
            IntOp::Pow => {
                let exp = u32::try_from(rhs).ok()?;
                lhs.checked_pow(exp)
            }
        }
    }
}

impl fmt::Display for IntOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntOp::Add => "+",
            IntOp::Sub => "-",
            IntOp::Mul => "*",
            IntOp::Pow => "^",
        };
        f.write_str(s)
    }
}

/// An integer-valued element: a literal, a free symbol, or an unfolded
/// arithmetic expression over either.
///
/// Mirrors `core.py`'s `IntLiteral`/`IntSymbol` pair, generalised with a
/// `BinOp` variant so expressions mixing a symbol with a literal (e.g.
/// `n * 8`) survive parsing instead of raising at construction time. Fully
/// literal subtrees are reduced eagerly by [`IntElement::fold`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntElement {
    Literal(i64),
    Symbol(String),
    BinOp {
        op: IntOp,
        lhs: Box<IntElement>,
        rhs: Box<IntElement>,
    },
}

impl IntElement {
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        IntElement::Symbol(name.into())
    }

    #[must_use]
    pub fn binop(op: IntOp, lhs: IntElement, rhs: IntElement) -> Self {
        IntElement::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// The free symbol names this element references (empty for a literal).
    #[must_use]
    pub fn required_symbols(&self) -> FxHashSet<String> {
        match self {
            IntElement::Literal(_) => FxHashSet::default(),
            IntElement::Symbol(name) => FxHashSet::from_iter([name.clone()]),
            IntElement::BinOp { lhs, rhs, .. } => {
                let mut s = lhs.required_symbols();
                s.extend(rhs.required_symbols());
                s
            }
        }
    }

    /// Reduce `Literal op Literal` subtrees eagerly; anything touching a
    /// `Symbol` is returned unevaluated.
    #[must_use]
    pub fn fold(&self) -> IntElement {
        match self {
            IntElement::Literal(_) | IntElement::Symbol(_) => self.clone(),
            IntElement::BinOp { op, lhs, rhs } => {
                let lhs = lhs.fold();
                let rhs = rhs.fold();
                match (&lhs, &rhs) {
                    (IntElement::Literal(a), IntElement::Literal(b)) => {
                        match op.apply(*a, *b) {
                            Some(v) => IntElement::Literal(v),
                            None => IntElement::binop(*op, lhs, rhs),
                        }
                    }
                    _ => IntElement::binop(*op, lhs, rhs),
                }
            }
        }
    }

    /// The resolved value, substituting `args` for any free symbols, after
    /// folding. `None` if a symbol remains unresolved or overflow occurs.
    #[must_use]
    pub fn resolve(&self, args: &FxHashMap<String, i64>) -> Option<i64> {
        let substituted = self.substitute(args);
        match substituted.fold() {
            IntElement::Literal(v) => Some(v),
            _ => None,
        }
    }

    fn substitute(&self, args: &FxHashMap<String, i64>) -> IntElement {
        match self {
            IntElement::Literal(v) => IntElement::Literal(*v),
            IntElement::Symbol(name) => args
                .get(name)
                .map(|v| IntElement::Literal(*v))
                .unwrap_or_else(|| self.clone()),
            IntElement::BinOp { op, lhs, rhs } => {
                IntElement::binop(*op, lhs.substitute(args), rhs.substitute(args))
            }
        }
    }

    #[must_use]
    pub fn as_literal(&self) -> Option<i64> {
        match self {
            IntElement::Literal(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for IntElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntElement::Literal(v) => write!(f, "{v}"),
            IntElement::Symbol(name) => write!(f, "${name}"),
            IntElement::BinOp { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}
