//! Text console - a stand-in for the input/UI layer
//!
//! Input line -> ConsoleCommand (parser) -> CommandExecutor -> ExecutionResult

pub mod executor;
pub mod parser;

pub use executor::{CommandExecutor, ExecutionResult, HELP};
pub use parser::ConsoleCommand;
