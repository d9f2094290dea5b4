// File: mojito-common/src/traits/mod.rs

pub mod api_traits;
pub mod storage_traits;

pub use api_traits::SocialApi;
pub use storage_traits::SessionStorage;
