pub mod cli;

pub use cli::{run, Cli};
pub use relsnap_core::{collect_all, CoreError, Snapshot};
