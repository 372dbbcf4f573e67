pub mod cache;
pub mod clock;
pub mod session;

pub use cache::{CacheSettings, ChatCache};
pub use session::ChatSession;
