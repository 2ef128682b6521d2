//! Facade over [`geopolitical_core`] so demos and downstream users can
//! depend on the workspace crate alone.

pub use geopolitical_core::*;
