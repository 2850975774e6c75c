//! ascii-booth: real-time ASCII photobooth.
//!
//! Frames from a live feed or a fixed raster are letterboxed into a sample
//! buffer ([`camera`]), mapped to palette glyphs ([`ascii`]) and painted onto
//! a glyph surface ([`renderer`]). [`context::RenderContext`] ties one render
//! loop together; [`event_loop`] drives it once per frame. [`strip`] runs the
//! photo capture sequence and [`export`] writes the results.

pub mod ascii;
pub mod camera;
pub mod cli;
pub mod config;
pub mod context;
pub mod event_loop;
pub mod export;
pub mod renderer;
pub mod strip;
pub mod transition;
