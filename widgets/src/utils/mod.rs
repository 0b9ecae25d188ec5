pub mod dom;

pub use dom::{set_height, set_hook, style_height};
