//! Colors of the command line theme, kept in one place so every message
//! looks the same.
//!
//! - TESSERA_TEAL: Main Color
//! - ERROR_RED: Failures

use colored::Color;

pub(crate) const TESSERA_TEAL: Color = Color::TrueColor {
    r: 64,
    g: 196,
    b: 180,
};

pub(crate) const ERROR_RED: Color = Color::TrueColor {
    r: 255,
    g: 87,
    b: 87,
};
