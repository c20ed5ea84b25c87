//! Wide → tidy transformation: serial dates, reshape, summary

pub mod dates;
pub mod reshaper;
pub mod summary;

pub use reshaper::reshape;
pub use summary::{format_preview, Summary, DEFAULT_PREVIEW_ROWS, LABEL_DELIMITER};
