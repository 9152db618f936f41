//! Request handlers.

pub mod chat;
pub mod health;
pub mod history;
pub mod process_video;
pub mod summarize;
pub mod upload;

pub use health::*;
pub use history::*;
pub use process_video::*;
pub use summarize::*;
pub use upload::*;
