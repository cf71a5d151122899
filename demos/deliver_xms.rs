use std::io;

use omsgate::{Credentials, OmsGateClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let user = std::env::var("OMSGATE_USER").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "OMSGATE_USER environment variable is required",
        )
    })?;
    let password = std::env::var("OMSGATE_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "OMSGATE_PASSWORD environment variable is required",
        )
    })?;
    let recipient = std::env::var("OMSGATE_RECIPIENT").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "OMSGATE_RECIPIENT environment variable is required",
        )
    })?;
    let message = std::env::var("OMSGATE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the omsgate demo.".to_owned());

    let mut client = OmsGateClient::new(Credentials::new(user, password)?);
    client.init().await?;

    let receipt = client.deliver_xms(&recipient, &message).await?;
    for (path, value) in receipt.iter() {
        println!("{path}: {value:?}");
    }

    Ok(())
}
