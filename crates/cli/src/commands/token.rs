//! Token issuing command.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET` - Signing secret shared with both servers

use cartpay_backend::Config;
use cartpay_backend::services::TokenIssuer;

use super::CliError;

/// Issue a token for `user_id` with the configured secret.
pub fn issue_token(user_id: &str) -> Result<String, CliError> {
    let config = Config::from_env()?;
    let token = TokenIssuer::new(&config.jwt_secret).issue(user_id)?;
    tracing::debug!(user_id, "Token issued");
    Ok(token)
}

/// Issue a token for `user_id` and print it.
pub fn issue(user_id: &str) -> Result<(), CliError> {
    let token = issue_token(user_id)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}
