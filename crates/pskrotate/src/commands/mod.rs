//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod credentials;
pub mod networks;
pub mod orgs;
pub mod rooms;
pub mod ssids;
pub mod tagged;
pub mod util;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use pskrotate_config::CredentialStore;
use pskrotate_core::ClientConfig;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Everything a command handler needs besides its own args.
pub struct Context {
    pub global: GlobalOpts,
    pub config: Config,
    pub store: CredentialStore,
    pub output: OutputFormat,
    pub color: bool,
    /// Prompts are allowed (stdin and stderr are terminals).
    pub interactive: bool,
}

impl Context {
    pub fn load(global: GlobalOpts) -> Result<Self, CliError> {
        let config = config::load(&global)?;
        let store = CredentialStore::open_default()?;
        let output = config::output_format(&global, &config);
        let color = output::should_color(config::color_mode(&global, &config));
        let interactive = io::stdin().is_terminal() && io::stderr().is_terminal();

        Ok(Self {
            global,
            config,
            store,
            output,
            color,
            interactive,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        self.config.client_config()
    }

    pub fn report_dir(&self) -> PathBuf {
        self.config.report_dir()
    }

    /// Print rendered command output to stdout.
    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.global.quiet);
    }

    /// Print a progress or status line to stderr.
    pub fn status(&self, line: &str) {
        if !self.global.quiet {
            eprintln!("{line}");
        }
    }
}

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &mut Context) -> Result<(), CliError> {
    match cmd {
        Command::Orgs(args) => orgs::handle(ctx, args).await,
        Command::Networks(args) => networks::handle(ctx, args).await,
        Command::Ssids(args) => ssids::handle(ctx, args).await,
        Command::UpdateTagged(args) => tagged::handle(ctx, args).await,
        Command::Rooms(args) => rooms::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are not API commands".into(),
        )),
    }
}
