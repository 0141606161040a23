//! Payment RPC commands.
//!
//! # Environment Variables
//!
//! - `PAYMENT_SERVICE_BASE_URI` - Payment service address (default: <http://localhost:9061>)
//! - `JWT_SECRET` - Needed only with `--user`

use cartpay_payment::PaymentClient;
use cartpay_payment::proto::PaymentResponse;

use super::CliError;
use super::token::issue_token;

const DEFAULT_ENDPOINT: &str = "http://localhost:9061";

/// How to authenticate RPC calls.
pub enum Credentials {
    /// Use an existing token.
    Token(String),
    /// Issue a token for this user id.
    User(String),
    /// Send no token; the server will reject the call.
    None,
}

/// One payment operation.
pub enum PaymentAction {
    Create { amount: f64 },
    List,
    Get { id: String },
    Delete { id: String },
}

/// Accept `host:port` as well as a full URI.
fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_owned()
    } else {
        format!("http://{endpoint}")
    }
}

/// Connect, authenticate, perform `action` and print the result.
pub async fn run(
    endpoint: Option<String>,
    credentials: Credentials,
    action: PaymentAction,
) -> Result<(), CliError> {
    let endpoint = endpoint
        .or_else(|| std::env::var("PAYMENT_SERVICE_BASE_URI").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
    let endpoint = normalize_endpoint(&endpoint);

    let token = match credentials {
        Credentials::Token(token) => Some(token),
        Credentials::User(user) => Some(issue_token(&user)?),
        Credentials::None => None,
    };

    tracing::info!("Connecting to payment service at {}", endpoint);
    let mut client = PaymentClient::connect(endpoint).await?;
    if let Some(token) = token {
        client = client.with_token(&token)?;
    }

    match action {
        PaymentAction::Create { amount } => print_payment(&client.create_payment(amount).await?),
        PaymentAction::List => {
            for payment in client.get_all_payments().await? {
                print_payment(&payment);
            }
        }
        PaymentAction::Get { id } => print_payment(&client.get_payment_by_id(&id).await?),
        PaymentAction::Delete { id } => {
            let message = client.delete_payment(&id).await?;
            #[allow(clippy::print_stdout)]
            {
                println!("{message}");
            }
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_payment(payment: &PaymentResponse) {
    println!("{}\t{}", payment.id, payment.amount);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("localhost:9061"), "http://localhost:9061");
        assert_eq!(
            normalize_endpoint("https://payments.internal:443"),
            "https://payments.internal:443"
        );
    }
}
