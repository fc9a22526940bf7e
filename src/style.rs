//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides convenience methods for applying ANSI
//! styling via the `colored` crate, implemented for `&str` and `String` so
//! literals can be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn item_style(&self) -> ColoredString;
    fn npc_style(&self) -> ColoredString;
    fn room_style(&self) -> ColoredString;
    fn description_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn menu_option_style(&self) -> ColoredString;
    fn time_style(&self) -> ColoredString;
    fn title_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn npc_style(&self) -> ColoredString {
        self.truecolor(13, 130, 60).underline()
    }
    fn room_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10)
    }
    fn description_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn menu_option_style(&self) -> ColoredString {
        self.bold()
    }
    fn time_style(&self) -> ColoredString {
        self.italic().truecolor(150, 150, 230)
    }
    fn title_style(&self) -> ColoredString {
        self.bright_yellow().bold()
    }
}

impl GameStyle for String {
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn npc_style(&self) -> ColoredString {
        self.as_str().npc_style()
    }
    fn room_style(&self) -> ColoredString {
        self.as_str().room_style()
    }
    fn description_style(&self) -> ColoredString {
        self.as_str().description_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn menu_option_style(&self) -> ColoredString {
        self.as_str().menu_option_style()
    }
    fn time_style(&self) -> ColoredString {
        self.as_str().time_style()
    }
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
}
