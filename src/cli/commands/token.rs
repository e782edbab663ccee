use anyhow::Context;
use clap::Args;

use crate::auth::{generate_jwt, Claims};
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "User id placed in the `id` claim")]
    pub user_id: i32,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);

    let token = generate_jwt(&Claims::new(args.user_id, hours)?, &config.security.jwt_secret)?;
    println!("{}", token);
    Ok(())
}
