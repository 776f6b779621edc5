/// Expectation check command.
pub mod check;
/// Default-value dump command.
pub mod dump;

mod util;
