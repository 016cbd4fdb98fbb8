//! Message formatting for the command line.
//!
//! - Highlight Text (make the text teal but not bold)
//! - System message formatting functions that produce the same
//! format messages.

use colored::Colorize;

use crate::cli::colors::{ERROR_RED, TESSERA_TEAL};

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the theme color to make it obvious.

    format!("{}", argument.color(TESSERA_TEAL))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Format a message on the command line according to the theme.
    //!
    //! Takes in a source name (like 'system') and the message as
    //! formatted text; output of [`format!`].

    let source_formatted = format!("{:7}", source_name.color(TESSERA_TEAL).bold());

    format!("[{}] {}", source_formatted, message)
}

pub fn error_message(message: String) -> String {
    let source_formatted = format!("{:7}", "error".color(ERROR_RED).bold());

    format!("[{}] {}", source_formatted, message)
}
