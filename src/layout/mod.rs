pub mod grid;
pub mod scroll_window;

pub use grid::GridLayout;
pub use scroll_window::ScrollWindow;
