//! Mint a session token for the admin console.
//!
//! Reads `JWT_SECRET` (and `JWT_ACCESS_EXPIRY_MINS`) from the environment or
//! `.env`.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use teckel_api::auth::jwt::{generate_access_token, JwtConfig};
use teckel_core::roles::{ROLE_ADMIN, ROLE_USER};

#[derive(Parser)]
#[command(name = "issue-token")]
#[command(about = "Mint a signed session token for the Royal Teckel Home API")]
struct Cli {
    /// Session subject recorded in the token (`sub` claim).
    subject: String,

    /// Role granted by the token.
    #[arg(value_enum, default_value_t = TokenRole::Admin)]
    role: TokenRole,
}

#[derive(Clone, Copy, ValueEnum)]
enum TokenRole {
    Admin,
    User,
}

impl TokenRole {
    fn as_str(self) -> &'static str {
        match self {
            TokenRole::Admin => ROLE_ADMIN,
            TokenRole::User => ROLE_USER,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let role = cli.role.as_str();
    let config = JwtConfig::from_env();
    let token = generate_access_token(&cli.subject, role, &config)
        .context("failed to sign session token")?;

    eprintln!(
        "Token for `{}` ({role}), valid {} minutes:",
        cli.subject, config.access_token_expiry_mins
    );
    println!("{token}");
    Ok(())
}
