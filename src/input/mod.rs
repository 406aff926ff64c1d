mod handler;

pub use handler::{focus_command, handle_key, FocusCommand};
