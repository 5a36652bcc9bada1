//! imgconv - image format conversion service
//!
//! Converts uploaded images between JPEG, PNG, WebP, TIFF, GIF and AVIF.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod codec;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
