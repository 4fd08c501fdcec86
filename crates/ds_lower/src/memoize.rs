//! Caching of source expressions that are read more than once.

use ds_ast::{AssignmentOp, SourceExpr};

use crate::names::NameAllocator;

/// A base safe to read repeatedly, plus the assignment that must run first
/// when the source had to be cached.
#[derive(Debug)]
pub struct Memoized {
    pub base: SourceExpr,
    pub cache: Option<AssignmentOp>,
}

/// Make `source` safe to read any number of times.
///
/// Identifiers and fragments are returned as they are. Anything else is
/// assigned to a fresh `<prefix>$N` temporary, which becomes the base.
pub fn memoize(names: &mut NameAllocator, prefix: &str, source: SourceExpr) -> Memoized {
    if source.is_reusable() {
        return Memoized {
            base: source,
            cache: None,
        };
    }

    let temp = names.allocate(prefix);
    tracing::trace!(%temp, "caching source expression");
    Memoized {
        base: SourceExpr::Identifier(temp.clone()),
        cache: Some(AssignmentOp::new(temp, source)),
    }
}
