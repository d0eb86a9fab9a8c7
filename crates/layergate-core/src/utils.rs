//! Utility functions shared by the graph, pattern, and rule modules.

pub mod paths;

#[doc(inline)]
pub use paths::{is_under, normalize, to_forward_slashes};
