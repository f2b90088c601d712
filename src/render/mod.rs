pub mod renderer;

pub use renderer::{Renderer, PAUSE_MESSAGE};
