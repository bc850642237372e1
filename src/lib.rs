//! An embeddable developer console for terminal applications.
//!
//! A [`Console`] mounts a panel into a small document model, runs typed
//! commands against a [`CommandRegistry`](commands::CommandRegistry), keeps
//! a navigable history, and can be themed, dragged and resized with the
//! mouse. [`runner::run_console_app`] drives it full screen.

pub mod clipboard;
pub mod commands;
pub mod components;
pub mod console;
pub mod constants;
pub mod debug_log;
pub mod dom;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod history;
pub mod keybindings;
pub mod layout;
pub mod markup;
pub mod options;
pub mod placement;
pub mod resize;
pub mod runner;
pub mod term_color;
pub mod theme;
pub mod tracing_sub;
pub mod ui;

pub use commands::Outcome;
pub use console::Console;
pub use error::ConsoleError;
pub use options::{Options, OptionsPatch};
pub use theme::Theme;
