//! Pure text rendering of controller snapshots.

pub mod table;

pub use table::{render, render_draft, RenderOptions};
