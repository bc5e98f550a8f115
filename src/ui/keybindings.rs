// Keybindings for the folio terminal session
// Maps typed commands to gallery and viewer actions.
//
// Grid:
// - n / next / right: Next page
// - p / prev / left: Previous page
// - o <i> / open <i>: Open viewer at item i of the current page
// - resize <px>: Change viewport width
// - cat <name>: Switch category
// - more: Scroll the feed to its bottom
// - view, feed, overview, reload, help, q
//
// Viewer:
// - Left / p: Previous item (wraps)
// - Right / n: Next item (wraps)
// - Escape / esc / q: Close viewer
// - < / >: Click the previous/next arrow (wraps)
// - click: Click on the backdrop (closes)
// - x: Click the close button
// - space: Play/pause (video)

use crate::models::Category;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Escape,
    Space,
}

/// Pointer targets inside the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    PreviousArrow,
    NextArrow,
    CloseButton,
    /// Anywhere outside the media content.
    Backdrop,
    Content,
}

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NextPage,
    PreviousPage,
    Open(usize),
    Resize(u32),
    SwitchCategory(Category),
    More,
    Show,
    Feed,
    Overview,
    Reload,
    Help,
    Quit,
    ViewerKey(Key),
    ViewerPointer(Pointer),
    /// Input that looked like a command but could not be used.
    Invalid(String),
}

pub struct Keybindings;

impl Keybindings {
    /// Resolves one input line. Blank lines resolve to nothing.
    pub fn resolve(mode: ViewMode, line: &str) -> Option<Action> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_ascii_lowercase();
        let arg = words.next();

        let action = match mode {
            ViewMode::Viewer => match command.as_str() {
                "left" | "p" | "prev" => Action::ViewerKey(Key::Left),
                "right" | "n" | "next" => Action::ViewerKey(Key::Right),
                "esc" | "escape" | "q" | "close" => Action::ViewerKey(Key::Escape),
                "space" | "play" | "pause" => Action::ViewerKey(Key::Space),
                "<" => Action::ViewerPointer(Pointer::PreviousArrow),
                ">" => Action::ViewerPointer(Pointer::NextArrow),
                "click" => Action::ViewerPointer(Pointer::Backdrop),
                "x" => Action::ViewerPointer(Pointer::CloseButton),
                "help" | "?" => Action::Help,
                other => Action::Invalid(format!("unknown viewer command '{other}'")),
            },
            ViewMode::Grid => match command.as_str() {
                "n" | "next" | "right" => Action::NextPage,
                "p" | "prev" | "left" => Action::PreviousPage,
                "o" | "open" => match arg.map(str::parse::<usize>) {
                    Some(Ok(slot)) => Action::Open(slot),
                    _ => Action::Invalid("usage: open <index on page>".into()),
                },
                "resize" => match arg.map(str::parse::<u32>) {
                    Some(Ok(width)) if width > 0 => Action::Resize(width),
                    _ => Action::Invalid("usage: resize <width px>".into()),
                },
                "cat" | "category" => match arg.map(str::parse::<Category>) {
                    Some(Ok(category)) => Action::SwitchCategory(category),
                    Some(Err(e)) => Action::Invalid(e.to_string()),
                    None => Action::Invalid("usage: cat <photography|web|videos>".into()),
                },
                "more" => Action::More,
                "view" | "show" | "ls" => Action::Show,
                "feed" => Action::Feed,
                "overview" | "home" => Action::Overview,
                "reload" => Action::Reload,
                "help" | "?" => Action::Help,
                "q" | "quit" | "exit" => Action::Quit,
                other => Action::Invalid(format!("unknown command '{other}'")),
            },
        };
        Some(action)
    }
}

pub const HELP: &str = "\
grid:   n|next  p|prev  open <i>  resize <px>  cat <photography|web|videos>
        view  feed  more  overview  reload  quit
viewer: left|p  right|n  <  >  esc|q  space  click  x";
