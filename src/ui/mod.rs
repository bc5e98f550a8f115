pub mod keybindings;
pub mod scroll_lock;
pub mod viewer;
