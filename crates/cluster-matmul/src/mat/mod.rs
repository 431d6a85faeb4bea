//! Owned matrix buffers.
//!
//! - [`MatI8`]: square `i8` operand, row-major
//! - [`MatI32`]: square `i32` accumulator output, row-major
//! - [`FillPattern`]: deterministic initialisation of operands
//!
//! # Example
//!
//! ```
//! use cluster_matmul::{FillPattern, MatI32, MatI8};
//!
//! let a = MatI8::filled(64, 1);
//! let b = MatI8::from_pattern(64, FillPattern::Ramp);
//! let c = MatI32::zeros(64);
//!
//! assert_eq!(a[(3, 5)], 1);
//! assert_eq!(b.transposed()[(5, 3)], b[(3, 5)]);
//! assert!(c.as_slice().iter().all(|&v| v == 0));
//! ```

mod owned;
mod pattern;

pub use owned::{MatI32, MatI8};
pub use pattern::FillPattern;
