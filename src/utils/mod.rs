pub mod merge;

pub use merge::{ensure_resolved, merge_up};
