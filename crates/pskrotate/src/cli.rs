//! Clap derive structures for the `pskrotate` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends only on clap + clap_complete so `build.rs` can include it.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pskrotate -- rotate guest wireless PSKs across a Meraki fleet
#[derive(Debug, Parser)]
#[command(
    name = "pskrotate",
    version,
    about = "Rotate guest wireless PSKs across Meraki networks by tag",
    long_about = "Rotates pre-shared keys on Meraki MR and MX SSIDs.\n\n\
        Networks are selected by tag (MX-GuestPSK for MR wireless, MXW-GuestPSK\n\
        for MX appliance SSIDs by default). Every run writes JSON reports and can\n\
        post them to a Webex room.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct GlobalOpts {
    /// Meraki Dashboard API key
    #[arg(long, env = "MERAKI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Webex bot token used to post reports
    #[arg(long, env = "WEBEX_BOT_TOKEN", global = true, hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Webex personal access token of the operator receiving reports
    #[arg(long, env = "WEBEX_PAT", global = true, hide_env_values = true)]
    pub pat: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "PSKROTATE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "PSKROTATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory for report files (overrides config)
    #[arg(long, env = "PSKROTATE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// SSID family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkType {
    /// MR access-point SSIDs
    #[value(alias = "mrw", alias = "mr")]
    Wireless,
    /// MX appliance SSIDs
    #[value(alias = "mxw", alias = "mx")]
    Appliance,
}

/// SSID families to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SsidScope {
    /// MR access-point SSIDs
    #[value(alias = "mrw", alias = "mr")]
    Wireless,
    /// MX appliance SSIDs
    #[value(alias = "mxw", alias = "mx")]
    Appliance,
    /// Both families, wireless first
    Both,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List organizations visible to the API key
    #[command(alias = "org")]
    Orgs(OrgsArgs),

    /// List networks in an organization
    #[command(alias = "net", alias = "n")]
    Networks(NetworksArgs),

    /// List SSIDs and update a single network's PSK
    #[command(alias = "ssid")]
    Ssids(SsidsArgs),

    /// Rotate the guest PSK on every tagged network
    #[command(alias = "rotate")]
    UpdateTagged(UpdateTaggedArgs),

    /// Manage Webex rooms used for reports
    Rooms(RoomsArgs),

    /// Manage CLI configuration and credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Organizations ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrgsArgs {
    #[command(subcommand)]
    pub command: OrgsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrgsCommand {
    /// List organizations
    #[command(alias = "ls")]
    List,
}

// ── Networks ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List networks
    #[command(alias = "ls")]
    List {
        /// Organization ID (prompted for when there are several)
        #[arg(long, env = "MERAKI_ORG_ID")]
        org_id: Option<String>,

        /// Only show networks carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
}

// ── SSIDs ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SsidsArgs {
    #[command(subcommand)]
    pub command: SsidsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SsidsCommand {
    /// List SSIDs of one network
    #[command(alias = "ls")]
    List {
        /// Network ID
        #[arg(long)]
        network_id: String,

        /// SSID family
        #[arg(long = "type", short = 't', default_value = "wireless")]
        network_type: SsidScope,
    },

    /// Update the PSK of one SSID in one network
    #[command(group(ArgGroup::new("target").required(true).args(["name", "number"])))]
    Update {
        /// Network ID
        #[arg(long)]
        network_id: String,

        /// SSID name (exact match)
        #[arg(long)]
        name: Option<String>,

        /// SSID number (wins over --name when both are given)
        #[arg(long)]
        number: Option<u8>,

        /// New PSK (prompted for when omitted)
        #[arg(long)]
        psk: Option<String>,

        /// SSID family
        #[arg(long = "type", short = 't', default_value = "wireless")]
        network_type: NetworkType,
    },

    /// Update the PSK of a named SSID in every network of an organization
    UpdateAll {
        /// SSID name (exact match)
        #[arg(long)]
        name: String,

        /// New PSK (prompted for when omitted)
        #[arg(long)]
        psk: Option<String>,

        /// SSID family
        #[arg(long = "type", short = 't', default_value = "wireless")]
        network_type: NetworkType,

        /// Organization ID (prompted for when there are several)
        #[arg(long, env = "MERAKI_ORG_ID")]
        org_id: Option<String>,
    },
}

// ── Tagged rotation ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UpdateTaggedArgs {
    /// New PSK (prompted for when omitted)
    #[arg(long)]
    pub psk: Option<String>,

    /// Organization ID (prompted for when there are several)
    #[arg(long, env = "MERAKI_ORG_ID")]
    pub org_id: Option<String>,

    /// Tag selecting networks whose MR wireless SSID is rotated
    #[arg(long)]
    pub wireless_tag: Option<String>,

    /// Tag selecting networks whose MX appliance SSID is rotated
    #[arg(long)]
    pub appliance_tag: Option<String>,

    /// MR SSID number to rotate
    #[arg(long)]
    pub wireless_number: Option<u8>,

    /// MX SSID number to rotate
    #[arg(long)]
    pub appliance_number: Option<u8>,

    /// Post the report to Webex
    #[arg(long)]
    pub notify: bool,

    /// Create a new Webex room with this title for the report
    #[arg(long, requires = "notify")]
    pub room_name: Option<String>,
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms the bot belongs to
    #[command(alias = "ls")]
    List,

    /// Create a room
    Create {
        /// Room title
        title: String,
    },

    /// Delete a room
    #[command(alias = "rm")]
    Delete {
        /// Room ID
        room_id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the effective configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store a credential (MERAKI_API_KEY, WEBEX_BOT_TOKEN, WEBEX_PAT, WEBEX_ROOM_ID)
    SetCredential {
        /// Credential name
        name: String,

        /// Value (prompted for, hidden, when omitted)
        #[arg(long)]
        value: Option<String>,

        /// Store in the system keyring instead of the credential file
        #[arg(long)]
        keyring: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
