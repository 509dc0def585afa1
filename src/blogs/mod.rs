pub mod access;
pub mod analytics;
pub mod comments;
pub mod posts;
