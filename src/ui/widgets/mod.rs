//! Terminal tray widgets.

mod help;
mod menu_list;
mod status_bar;

pub use help::HelpLine;
pub use menu_list::MenuList;
pub use status_bar::StatusBar;
