//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use pskrotate_config::{CredentialStore, keys, resolve_secret, store_in_keyring};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Config in TOML form plus where each credential resolves from. Values
/// are never printed.
fn format_config_redacted(cfg: &Config, store: &CredentialStore) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[dashboard]");
    let _ = writeln!(out, "base_url = \"{}\"", cfg.dashboard.base_url);
    let _ = writeln!(out, "max_retries = {}", cfg.dashboard.max_retries);
    let _ = writeln!(out);
    let _ = writeln!(out, "[messaging]");
    let _ = writeln!(out, "base_url = \"{}\"", cfg.messaging.base_url);
    let _ = writeln!(out, "report_title = \"{}\"", cfg.messaging.report_title);
    let _ = writeln!(out);
    let _ = writeln!(out, "[guest]");
    let _ = writeln!(out, "wireless_tag = \"{}\"", cfg.guest.wireless_tag);
    let _ = writeln!(out, "appliance_tag = \"{}\"", cfg.guest.appliance_tag);
    let _ = writeln!(out, "wireless_number = {}", cfg.guest.wireless_number);
    let _ = writeln!(out, "appliance_number = {}", cfg.guest.appliance_number);
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "data_dir = \"{}\"", cfg.report_dir().display());
    if let Some(ref ca) = cfg.defaults.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "# credentials ({})", store.path().display());
    for name in keys::ALL {
        let source = match resolve_secret(name, store) {
            Some((_, source)) => format!("set ({source})"),
            None => "not set".into(),
        };
        let _ = writeln!(out, "# {name}: {source}");
    }

    out
}

/// Ask where a secret goes and store it there.
fn store_secret(store: &mut CredentialStore, name: &str, value: &str) -> Result<(), CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to credential file",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store {name}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store_in_keyring(name, value)?;
        eprintln!("   ✓ {name} stored in system keyring");
    } else {
        store.set(name, value)?;
        eprintln!("   ✓ {name} saved to {}", store.path().display());
    }
    Ok(())
}

/// Hidden prompt; blank input skips.
fn prompt_optional_secret(label: &str) -> Result<Option<String>, CliError> {
    let value = rpassword::prompt_password(format!("{label} (blank to skip): ")).map_err(prompt_err)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}

fn check_credential_name(name: &str, keyring: bool) -> Result<(), CliError> {
    if !keys::ALL.contains(&name) {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: format!("unknown credential '{name}'. Valid names: {}", keys::ALL.join(", ")),
        });
    }
    if keyring && !keys::is_secret(name) {
        return Err(CliError::Validation {
            field: "keyring".into(),
            reason: format!("{name} is not a secret and is kept in the credential file"),
        });
    }
    Ok(())
}

fn text_input(prompt: &str, default: String) -> Result<String, CliError> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(prompt_err)
}

fn number_input(prompt: &str, default: u8) -> Result<u8, CliError> {
    loop {
        let raw = text_input(prompt, default.to_string())?;
        match raw.trim().parse::<u8>() {
            Ok(n) if n <= 14 => return Ok(n),
            _ => eprintln!("   SSID numbers run from 0 to 14"),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("pskrotate configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = pskrotate_config::load_config_or_default();
            let mut store = CredentialStore::open_default()?;

            // 1. Credentials
            for (name, label) in [
                (keys::MERAKI_API_KEY, "Meraki API key"),
                (keys::WEBEX_BOT_TOKEN, "Webex bot token"),
                (keys::WEBEX_PAT, "Webex personal access token"),
            ] {
                if let Some(value) = prompt_optional_secret(label)? {
                    store_secret(&mut store, name, &value)?;
                }
            }

            // 2. Tagged rotation targets
            cfg.guest.wireless_tag = text_input(
                "Tag for networks with an MR guest SSID",
                cfg.guest.wireless_tag.clone(),
            )?;
            cfg.guest.wireless_number = number_input("MR guest SSID number", cfg.guest.wireless_number)?;
            cfg.guest.appliance_tag = text_input(
                "Tag for networks with an MX guest SSID",
                cfg.guest.appliance_tag.clone(),
            )?;
            cfg.guest.appliance_number =
                number_input("MX guest SSID number", cfg.guest.appliance_number)?;

            // 3. Reports
            let dir = text_input(
                "Report directory",
                cfg.report_dir().display().to_string(),
            )?;
            cfg.defaults.data_dir = Some(dir.into());

            let written = pskrotate_config::save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("\n  Test it: pskrotate orgs list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let store = CredentialStore::open_default()?;
            let format = config::output_format(global, &cfg);
            let out = output::render_single(
                format,
                &cfg,
                |c| format_config_redacted(c, &store),
                |_| config::config_path().display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── SetCredential ───────────────────────────────────────────
        ConfigCommand::SetCredential {
            name,
            value,
            keyring,
        } => {
            let name = name.to_ascii_uppercase();
            check_credential_name(&name, keyring)?;

            let value = match value {
                Some(v) => v,
                None => rpassword::prompt_password(format!("{name}: ")).map_err(prompt_err)?,
            };
            let value = value.trim();
            if value.is_empty() {
                return Err(CliError::Validation {
                    field: name,
                    reason: "value cannot be empty".into(),
                });
            }

            if keyring {
                store_in_keyring(&name, value)?;
                if !global.quiet {
                    eprintln!("✓ {name} stored in system keyring");
                }
            } else {
                let mut store = CredentialStore::open_default()?;
                store.set(&name, value)?;
                if !global.quiet {
                    eprintln!("✓ {name} saved to {}", store.path().display());
                }
            }
            Ok(())
        }
    }
}
