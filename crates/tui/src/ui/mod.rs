//! UI rendering module for the TUI application.
//!
//! This module provides the main view, the OTP entry component, the theme
//! palettes, and the runtime that drives them.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
