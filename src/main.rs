//! stowbar: a menu bar control item coordinator, driven from stdin.
//!
//! Run with:  `RUST_LOG=info stowbar`, then type `status`, `click hidden`,
//! `right-click hidden`, `menu 0`, `drag hidden 120`, `save` or `quit`.

mod app;
mod command;

use anyhow::{Context, Result};
use std::rc::Rc;
use stow_config::{Defaults, SavedState};
use stow_control::HeadlessPlatform;
use stow_core::{Rect, Screen};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("stowbar v{} starting", env!("CARGO_PKG_VERSION"));

    let config = stow_config::load(stow_config::default_path()).unwrap_or_else(|e| {
        warn!("{e}; using default configuration");
        Default::default()
    });

    let defaults = Defaults::standard();
    defaults.replace_with(
        &Defaults::load(stow_config::defaults_path()).context("loading preferred positions")?,
    );

    let state_path = stow_config::state_path();
    let saved = SavedState::load(&state_path).unwrap_or_else(|e| {
        warn!("{e}; ignoring saved control items");
        SavedState::default()
    });

    let screen = Screen::new(Rect::new(
        0.0,
        0.0,
        config.headless.screen_width,
        config.headless.screen_height,
    ));
    let platform = Rc::new(HeadlessPlatform::new(defaults, screen));

    let app = app::App::new(platform, &config, &saved, Some(state_path));
    app.run(std::io::stdin().lock())
}
