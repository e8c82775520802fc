//! Operator prompts used by the assignment flow.

pub mod console;
pub mod mock;

pub use console::ConsolePrompt;
pub use mock::ScriptedPrompt;
