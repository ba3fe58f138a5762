pub mod commands;
pub mod completion;
pub mod engine;
pub mod mode;
pub mod prompt;
pub mod queue;
pub mod resolve;
pub mod suggestion;

pub use commands::Command;
pub use completion::{Completion, CompletionEngine};
pub use engine::Session;
pub use mode::{Mode, ModeStack};
pub use prompt::{run_interactive, run_until_root, PromptOptions};
pub use queue::{QueueAccumulator, QueueOrigin};
pub use resolve::{BrowseState, Resolution};
pub use suggestion::{Payload, Suggestion};
