pub mod article;
pub mod auth;
pub mod category;
pub mod message;
pub mod topic;
pub mod user;

pub use auth::*;
