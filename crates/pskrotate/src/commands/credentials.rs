//! Credential acquisition for command handlers.
//!
//! Drives `CredentialState` from flag / env / keyring / file input through
//! live validation, re-prompting (bounded) when interactive. Handlers only
//! ever get a client built from a validated credential.

use std::future::Future;

use pskrotate_api::{DashboardClient, MessagingClient};
use pskrotate_config::{keys, resolve_secret};
use pskrotate_core::credential::{check_dashboard_key, check_messaging_token};
use pskrotate_core::{ClientConfig, CredentialState, ValidCredential, Verdict};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::Context;
use crate::error::CliError;
use crate::output;

/// Prompts allowed per credential before giving up.
const MAX_ATTEMPTS: usize = 3;

// ── Public entry points ─────────────────────────────────────────────

/// A dashboard client authenticated with a validated API key.
pub async fn dashboard(ctx: &mut Context) -> Result<DashboardClient, CliError> {
    let cfg = ctx.client_config();
    let flag = ctx.global.api_key.clone();
    let credential = acquire(ctx, keys::MERAKI_API_KEY, "Meraki API key", flag, |secret| {
        verify_dashboard(cfg.clone(), secret)
    })
    .await?;
    Ok(cfg.dashboard_client(credential.secret())?)
}

/// A messaging client authenticated with the validated bot token.
pub async fn bot(ctx: &mut Context) -> Result<MessagingClient, CliError> {
    let cfg = ctx.client_config();
    let flag = ctx.global.bot_token.clone();
    let credential = acquire(ctx, keys::WEBEX_BOT_TOKEN, "Webex bot token", flag, |secret| {
        verify_messaging(cfg.clone(), secret)
    })
    .await?;
    Ok(cfg.messaging_client(credential.secret())?)
}

/// User id of the operator, from their validated personal access token.
///
/// The id is persisted as `WEBEX_USER_ID`.
pub async fn operator_id(ctx: &mut Context) -> Result<String, CliError> {
    let cfg = ctx.client_config();
    let flag = ctx.global.pat.clone();
    let credential = acquire(
        ctx,
        keys::WEBEX_PAT,
        "Webex personal access token",
        flag,
        |secret| verify_messaging(cfg.clone(), secret),
    )
    .await?;

    let user_id = credential
        .identity()
        .map(str::to_owned)
        .ok_or_else(|| CliError::Internal("the personal access token has no user id".into()))?;
    if ctx.store.get(keys::WEBEX_USER_ID) != Some(user_id.as_str()) {
        ctx.store.set(keys::WEBEX_USER_ID, &user_id)?;
    }
    Ok(user_id)
}

// ── Verdicts ────────────────────────────────────────────────────────

async fn verify_dashboard(cfg: ClientConfig, secret: SecretString) -> Result<Verdict, CliError> {
    let client = cfg.dashboard_client(&secret)?;
    Ok(check_dashboard_key(&client).await?)
}

async fn verify_messaging(cfg: ClientConfig, secret: SecretString) -> Result<Verdict, CliError> {
    let client = cfg.messaging_client(&secret)?;
    Ok(check_messaging_token(&client).await?)
}

// ── State machine driver ────────────────────────────────────────────

async fn acquire<F, Fut>(
    ctx: &mut Context,
    name: &str,
    label: &str,
    flag: Option<String>,
    check: F,
) -> Result<ValidCredential, CliError>
where
    F: Fn(SecretString) -> Fut,
    Fut: Future<Output = Result<Verdict, CliError>>,
{
    let initial = flag.or_else(|| {
        resolve_secret(name, &ctx.store).map(|(secret, source)| {
            debug!(name, %source, "using stored credential");
            secret.expose_secret().to_owned()
        })
    });

    let mut state = CredentialState::from_stored(initial.as_deref());
    let mut attempts = 0;
    let mut prompted = false;

    loop {
        debug!(name, state = state.name(), "credential state");
        state = match state {
            CredentialState::Valid(credential) => {
                if prompted {
                    ctx.store.set(name, credential.secret().expose_secret())?;
                    ctx.status(&format!(
                        "{label} saved to {}",
                        ctx.store.path().display()
                    ));
                }
                return Ok(credential);
            }
            CredentialState::PendingValidation { secret } => {
                let verdict = check(secret.clone()).await?;
                CredentialState::PendingValidation { secret }.resolve(verdict)
            }
            waiting => {
                let reason = match &waiting {
                    CredentialState::Invalid { reason } => Some(reason.clone()),
                    _ => None,
                };
                if !ctx.interactive || attempts >= MAX_ATTEMPTS {
                    return Err(match reason {
                        Some(reason) => CliError::AuthFailed {
                            name: name.into(),
                            reason,
                        },
                        None => CliError::NoCredentials { name: name.into() },
                    });
                }
                if let Some(reason) = reason {
                    eprintln!("{}", output::bad(&format!("{label} rejected: {reason}"), ctx.color));
                }
                attempts += 1;
                prompted = true;
                let input = rpassword::prompt_password(format!("{label}: "))?;
                waiting.submit(&input)
            }
        };
    }
}
