mod milestone;
mod project;
mod source;
mod task;

pub use milestone::*;
pub use project::*;
pub use source::*;
pub use task::*;
