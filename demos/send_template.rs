use std::io;

use mandrill::{MandrillClientBuilder, Message, RecipientType, SendTemplate, TemplateName};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let template = std::env::var("MANDRILL_TEMPLATE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_TEMPLATE environment variable is required",
        )
    })?;
    let to = std::env::var("MANDRILL_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_TO environment variable is required",
        )
    })?;

    let mut message = Message::default();
    message.add_recipient(to, "", RecipientType::To);

    let request = SendTemplate::new(
        TemplateName::new(template)?,
        [("header", "You won the prize!")],
        message,
    );

    let client = MandrillClientBuilder::from_env()?.build()?;
    let results = client.send_template(&request).await?;
    println!("{results:?}");

    Ok(())
}
