//! Utility functions for xtask commands

use std::path::Path;

use anyhow::{Context, Result};
use combat_content::{ContentBundle, ContentFactory};

/// Loads content from `data_dir`, or the built-in set when none is given.
pub fn load_content(data_dir: Option<&Path>) -> Result<ContentBundle> {
    match data_dir {
        Some(dir) => ContentFactory::new(dir)
            .load_bundle()
            .with_context(|| format!("Failed to load content from {}", dir.display())),
        None => ContentFactory::embedded().context("Built-in content is invalid"),
    }
}

pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// `current/max`, red once depleted.
pub fn format_pool(current: i32, max: i32) -> String {
    let text = format!("{current}/{max}");
    if current <= 0 {
        console::style(text).red().to_string()
    } else {
        text
    }
}
