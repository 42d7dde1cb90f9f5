//! Reading and writing vocabulary and merges files.

pub mod format;
pub mod load;
pub mod save;

pub use format::{model_files, MERGES_FILE, MERGES_HEADER, VOCAB_FILE};
pub use load::TokenizerLoader;
pub use save::TokenizerSaver;
