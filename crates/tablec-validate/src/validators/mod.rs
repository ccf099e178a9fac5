//! Built-in validators.

mod codename;
mod range;
mod set;

pub use codename::{CodenameFactory, CodenameValidator};
pub use range::{RangeFactory, RangeValidator};
pub use set::{SetFactory, SetValidator};
