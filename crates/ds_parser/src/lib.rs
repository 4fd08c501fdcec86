//! ECMAScript/TypeScript front end for destructure.
//!
//! Wraps the standard SWC parser. The syntax is picked from the file
//! extension:
//!
//! - `.ts`, `.tsx` → TypeScript (TSX for `.tsx`)
//! - `.jsx`        → ECMAScript with JSX
//! - anything else → ECMAScript

pub mod parse;

pub use parse::{parse_source, ParseResult};
