pub mod file;

pub use file::{render, render_str};
