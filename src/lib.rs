//! Alt text generator - describes uploaded images for accessibility
//!
//! A small web tool: the user uploads an image, it is re-encoded and hosted on
//! imgbb, and the public URL is sent to a Wordware app that streams back the
//! alt text shown on the page.

pub mod describe;
pub mod error;
pub mod hosting;
pub mod image;
pub mod models;
pub mod pipeline;
pub mod web;

pub use error::{Error, Result};
