//! Sign-in, registration and profile commands.
//!
//! # Usage
//!
//! ```bash
//! comptoir auth login -e awa@boutique.sn -p '...'
//! comptoir auth whoami
//! comptoir auth logout
//! ```
//!
//! The password may also come from `COMPTOIR_PASSWORD`.

use clap::Subcommand;
use comptoir_client::{ApiClient, Identity};
use comptoir_core::{Email, LoginDto, RegisterDto, UpdateProfileDto};
use tracing::info;

use super::CommandError;
use crate::output::{Printer, render_user};

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and remember the credentials
    Login {
        #[arg(short, long)]
        email: Email,

        /// Password (falls back to `COMPTOIR_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: Email,

        /// Password (falls back to `COMPTOIR_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },
    /// Sign out; the anonymous session is used again afterwards
    Logout,
    /// Show who the console is acting as
    Whoami,
    /// Exchange the stored refresh token for a new access token
    Refresh,
    /// Change profile fields of the signed-in user
    UpdateProfile {
        #[arg(long)]
        email: Option<Email>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
}

fn password(arg: Option<String>) -> Result<String, CommandError> {
    arg.or_else(|| std::env::var("COMPTOIR_PASSWORD").ok())
        .filter(|password| !password.is_empty())
        .ok_or_else(|| {
            CommandError::InvalidInput(
                "a password is required (--password or COMPTOIR_PASSWORD)".to_owned(),
            )
        })
}

/// Run an `auth` subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails or arguments are missing.
pub async fn run(
    client: &ApiClient,
    printer: Printer,
    command: AuthCommand,
) -> Result<(), CommandError> {
    match command {
        AuthCommand::Login { email, password: pw } => {
            let credentials = LoginDto {
                email,
                password: password(pw)?,
            };
            let response = client.users().login(&credentials).await?;
            printer.emit(&response.data.user, render_user)?;
        }
        AuthCommand::Register {
            email,
            password: pw,
            first_name,
            last_name,
        } => {
            let registration = RegisterDto {
                email,
                password: password(pw)?,
                first_name,
                last_name,
            };
            let response = client.users().register(&registration).await?;
            printer.emit(&response.data.user, render_user)?;
        }
        AuthCommand::Logout => {
            client.users().logout().await?;
            printer.done("Déconnecté.");
        }
        AuthCommand::Whoami => match client.identity().await? {
            Identity::Bearer(_) => {
                let profile = client.users().get_profile().await?;
                printer.emit(&profile.data, render_user)?;
            }
            Identity::Session(token) => {
                printer.done(&format!("Non connecté (session anonyme {token})"));
            }
        },
        AuthCommand::Refresh => {
            let response = client.users().refresh_token().await?;
            info!(user_id = %response.data.user.id, "access token refreshed");
            printer.done("Jeton renouvelé.");
        }
        AuthCommand::UpdateProfile {
            email,
            first_name,
            last_name,
        } => {
            let update = UpdateProfileDto {
                email,
                first_name,
                last_name,
            };
            if update.email.is_none() && update.first_name.is_none() && update.last_name.is_none()
            {
                return Err(CommandError::InvalidInput("nothing to update".to_owned()));
            }
            let profile = client.users().update_profile(&update).await?;
            printer.emit(&profile.data, render_user)?;
        }
    }
    Ok(())
}
