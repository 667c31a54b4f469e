use std::io::{self, Write};

use clap::{Args, Subcommand};

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Store a bearer token issued by the backend
    Login(LoginArgs),
    /// Drop the token and user record and clear the cart
    Logout,
    /// Show whether a token is stored
    Show,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Bearer token
    #[arg(long, env = "SKYRITING_TOKEN", hide_env_values = true)]
    token: String,
}

pub(crate) async fn run(context: &Context, command: SessionCommand) -> Result<(), String> {
    let session = context.session();

    let message = match command.command {
        SessionSubcommand::Login(args) => {
            if args.token.trim().is_empty() {
                return Err("token cannot be empty".to_string());
            }

            session
                .set_token(&args.token)
                .await
                .map_err(|error| format!("failed to store token: {error}"))?;

            "signed in"
        }
        SessionSubcommand::Logout => {
            let cart = context.cart_store().await;

            session
                .logout(&cart)
                .await
                .map_err(|error| format!("failed to sign out: {error}"))?;

            "signed out"
        }
        SessionSubcommand::Show => {
            if session.token().await.is_some() {
                "signed in"
            } else {
                "signed out"
            }
        }
    };

    writeln!(io::stdout().lock(), "{message}").map_err(|error| format!("failed to write: {error}"))
}
