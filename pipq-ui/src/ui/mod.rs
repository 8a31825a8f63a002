pub mod input;
pub mod layout_helpers;
pub mod list_selector;
pub mod render;
pub mod style;
pub mod terminal;

pub use input::{AppEvent, InputEvent, InputSource, KeyCode, Modifiers};
pub use list_selector::{Bounds, ListSelector};
pub use render::{Rect, RenderBuf};
pub use style::{Color, Style};
pub use terminal::TerminalSession;
