use mandrill::MandrillClientBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = MandrillClientBuilder::from_env()?.build()?;
    let pong = client.ping().await?;
    println!("{pong}");

    Ok(())
}
