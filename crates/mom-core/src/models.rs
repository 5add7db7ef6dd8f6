pub mod meeting;
pub mod placeholder;
