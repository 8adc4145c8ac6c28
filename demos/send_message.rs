use std::io;

use mandrill::{
    DeliveryOptions, MandrillClientBuilder, Message, RecipientType, SendAt, SendMessage,
    for_recipient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let from = std::env::var("MANDRILL_FROM").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_FROM environment variable is required",
        )
    })?;
    let to = std::env::var("MANDRILL_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_TO environment variable is required",
        )
    })?;

    let mut message = Message {
        from_email: Some(from),
        subject: Some("Hello from the mandrill demo".to_owned()),
        html: Some("<p>Hi *|NAME|*!</p>".to_owned()),
        text: Some("Hi *|NAME|*!".to_owned()),
        ..Default::default()
    };
    message.add_recipient(to.clone(), "", RecipientType::To);
    message.set_global_merge_vars([("NAME", "there")]);
    message.merge_vars.push(for_recipient(to, [("NAME", "friend")]));

    let mut delivery = DeliveryOptions::default();
    if let Ok(send_at) = std::env::var("MANDRILL_SEND_AT") {
        delivery.send_at = Some(SendAt::new(send_at)?);
    }

    let client = MandrillClientBuilder::from_env()?.build()?;
    let results = client
        .send_message(&SendMessage::new(message).with_delivery(delivery))
        .await?;

    for result in results {
        println!(
            "{}: {} (reject_reason: {:?}, id: {})",
            result.email,
            result.status.as_str(),
            result.reject_reason.map(|reason| reason.as_str()),
            result.id
        );
    }

    Ok(())
}
