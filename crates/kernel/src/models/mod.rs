//! Database models.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CreateComment};
pub use post::{CreatePost, Post};
pub use user::{Badge, CreateUser, User};
