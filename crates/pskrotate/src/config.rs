//! CLI configuration: thin wrapper around `pskrotate_config`.
//!
//! Adds the `GlobalOpts` overrides (--timeout, --data-dir, --output,
//! --color) on top of the file + env layering.

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use pskrotate_config::{Config, config_path, credentials_path};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Load the config and apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = pskrotate_config::load_config()?;
    apply_overrides(&mut cfg, global)?;
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(timeout) = global.timeout {
        if timeout == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        cfg.defaults.timeout = timeout;
    }
    if let Some(ref dir) = global.data_dir {
        cfg.defaults.data_dir = Some(dir.clone());
    }
    Ok(())
}

/// Output format: flag, then config, then table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Color mode: flag, then config, then auto.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}
