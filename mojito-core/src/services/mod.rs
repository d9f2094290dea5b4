// File: mojito-core/src/services/mod.rs

pub mod feed_loader;
pub mod overlay;
pub mod session_validator;

pub use feed_loader::{FeedLoader, FeedState, FeedView};
pub use overlay::OverlayController;
pub use session_validator::{SessionValidator, SESSION_EXPIRED_MESSAGE};
