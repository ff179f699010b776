// Adapters layer: concrete implementations of the domain ports.

pub mod canvas;
pub mod credentials;

pub use canvas::CanvasClient;
pub use credentials::{FixedPrompt, ProcessEnv};
#[cfg(feature = "cli")]
pub use credentials::TerminalPrompt;
