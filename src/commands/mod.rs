pub mod inspect;
pub mod run;

// Re-export command functions for convenience
pub use inspect::{parse, prompt, resolve};
pub use run::run;
