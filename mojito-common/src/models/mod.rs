// File: mojito-common/src/models/mod.rs

pub mod post;
pub mod state;
pub mod user;

pub use post::Post;
pub use state::ApplicationState;
pub use user::User;
