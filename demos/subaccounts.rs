use std::io;

use mandrill::{MandrillClientBuilder, MandrillError, SubaccountId, SubaccountSpec};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let id = std::env::var("MANDRILL_SUBACCOUNT").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_SUBACCOUNT environment variable is required",
        )
    })?;
    let id = SubaccountId::new(id)?;

    let client = MandrillClientBuilder::from_env()?.build()?;

    let subaccount = match client.subaccount_info(&id).await {
        Ok(existing) => existing,
        Err(MandrillError::Api(err)) if err.name == "Unknown_Subaccount" => {
            let mut spec = SubaccountSpec::new(id.clone());
            spec.notes = Some("created by the mandrill demo".to_owned());
            client.add_subaccount(&spec).await?
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "{} ({:?}): reputation {}, sent {} total",
        subaccount.id, subaccount.status, subaccount.reputation, subaccount.sent_total
    );

    for other in client.list_subaccounts(None).await? {
        println!("- {}", other.id);
    }

    Ok(())
}
