pub mod dispatch;
pub mod types;

pub use dispatch::{dispatch, EXIT_COMPLETED_WITH_FAILURES};
pub use types::{Cli, Commands};
