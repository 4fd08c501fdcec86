//! Recursive lowering of a binding pattern into flat assignments.
//!
//! `{a, b: [c, d]} = f()` →
//! `var$0 = f(), a = var$0.a, var$1 = var$0.b, c = var$1[0], d = var$1[1]`

use ds_ast::{
    Accessor, ArrayElement, AssignmentOp, BindingPattern, BindingTarget, LowerConfig, SourceExpr,
};

use crate::error::{LowerError, Result};
use crate::memoize::memoize;
use crate::names::NameAllocator;

/// Lowering context for one compilation unit.
///
/// Owns the temporary-name counter, so separate units lowered with separate
/// contexts never interfere. Call [`Lowerer::reset`] to reuse a context for
/// an unrelated unit with deterministic names.
#[derive(Debug, Default)]
pub struct Lowerer {
    pub(crate) names: NameAllocator,
    pub(crate) config: LowerConfig,
}

impl Lowerer {
    pub fn new(config: LowerConfig) -> Self {
        Self {
            names: NameAllocator::new(),
            config,
        }
    }

    pub fn config(&self) -> &LowerConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.names.reset();
    }

    /// Next `<temp_prefix>$N` name from the shared counter.
    pub(crate) fn allocate_temp(&mut self) -> String {
        self.names.allocate(&self.config.temp_prefix)
    }

    /// Lower `pattern = source` into assignments in evaluation order.
    pub fn lower_declaration(
        &mut self,
        pattern: &BindingPattern,
        source: SourceExpr,
    ) -> Result<Vec<AssignmentOp>> {
        let mut ops = Vec::new();
        self.lower_into(pattern, source, &mut ops)?;
        tracing::trace!(members = pattern.len(), assignments = ops.len(), "lowered pattern");
        Ok(ops)
    }

    fn lower_into(
        &mut self,
        pattern: &BindingPattern,
        source: SourceExpr,
        out: &mut Vec<AssignmentOp>,
    ) -> Result<()> {
        // A single member reads the source once, so it never needs a cache.
        let base = if pattern.len() == 1 {
            source
        } else {
            let memo = memoize(&mut self.names, &self.config.temp_prefix, source);
            out.extend(memo.cache);
            memo.base
        };

        match pattern {
            BindingPattern::Object(obj) => {
                for prop in &obj.properties {
                    let value = base.clone().member(Accessor::Property(prop.key.clone()));
                    self.bind(&prop.target, value, out)?;
                }
            }
            BindingPattern::Array(arr) => {
                let len = arr.elements.len();
                for (index, element) in arr.elements.iter().enumerate() {
                    match element {
                        ArrayElement::Skip => {}
                        ArrayElement::Target(target) => {
                            self.bind(target, base.clone().member(Accessor::Index(index)), out)?;
                        }
                        ArrayElement::Rest(name) => {
                            if index + 1 != len {
                                return Err(LowerError::MisplacedRest { index, len });
                            }
                            let value = base.clone().member(Accessor::SliceFrom(index));
                            out.push(AssignmentOp::new(name.clone(), value));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn bind(
        &mut self,
        target: &BindingTarget,
        value: SourceExpr,
        out: &mut Vec<AssignmentOp>,
    ) -> Result<()> {
        match target {
            BindingTarget::Identifier(name) => {
                out.push(AssignmentOp::new(name.clone(), value));
                Ok(())
            }
            BindingTarget::Pattern(nested) => self.lower_into(nested, value, out),
        }
    }
}
