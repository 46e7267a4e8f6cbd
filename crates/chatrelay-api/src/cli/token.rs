//! `chatrelay token`: mint a hub publisher JWT.

use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;

use chatrelay_infra::hub::token::mint_publisher_token;

pub fn print_token(secret: String, topics: &[String], ttl_secs: Option<u64>, json: bool) -> Result<()> {
    let secret = SecretString::from(secret);
    let token = mint_publisher_token(&secret, topics, ttl_secs.map(Duration::from_secs))
        .context("failed to mint publisher token")?;

    if json {
        println!("{}", serde_json::json!({ "token": token }));
    } else {
        println!("{token}");
    }
    Ok(())
}
