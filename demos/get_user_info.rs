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

    let mut client = OmsGateClient::new(Credentials::new(user, password)?);
    client.init().await?;

    println!("service info:");
    for (path, value) in client.service_config().into_iter().flat_map(|c| c.iter()) {
        println!("  {path}: {value:?}");
    }

    let info = client.get_user_info().await?;
    println!("user info:");
    for (path, value) in info.iter() {
        println!("  {path}: {value:?}");
    }

    Ok(())
}
