pub mod aspect;
pub mod generate;
pub mod href;
pub mod poll;
pub mod prompt;
pub mod proxy;

pub use aspect::{image_size_for, AspectRatio};
pub use generate::GenerationRelay;
pub use href::extract_href;
pub use poll::{PollOutcome, PollPolicy};
pub use prompt::build_prompt;
pub use proxy::ImageProxy;
