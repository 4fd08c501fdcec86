//! Lowering pass that rewrites destructuring bindings into plain assignments.
//!
//! Transforms:
//! - `var {x, y} = z`    → `var x = z.x, y = z.y`
//! - `var [a, ...b] = f()` → `var var$0 = f(), a = var$0[0], b = var$0.slice(1)`
//! - `function g({y}) {}` → `function g(arg$0) { var y = arg$0.y; }`
//!
//! [`Lowerer`] carries the naming context and exposes the two entry points,
//! [`Lowerer::lower_declaration`] and [`Lowerer::lower_function_signature`].
//! [`lower_module`] applies both to a whole SWC module.

pub mod classify;
pub mod emit;
pub mod error;
pub mod hoist;
pub mod lower;
pub mod memoize;
pub mod names;
pub mod transform;

#[cfg(test)]
mod test_util;

pub use emit::{render_assignments, render_preamble};
pub use error::LowerError;
pub use hoist::{HoistableParam, LoweredSignature, Preamble};
pub use lower::Lowerer;
pub use transform::{lower_module, lower_module_with};
