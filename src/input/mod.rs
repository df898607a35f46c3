pub mod handler;
pub mod touch;

pub use handler::{InputEvent, InputHandler};
pub use touch::TouchPad;
