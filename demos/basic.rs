use livefeed_rs::{FeedClient, FeedClientOptions};

/// Connect to a live feed server and print messages as they arrive.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "livefeed_rs=debug".into()),
        )
        .init();

    let url = std::env::var("FEED_WS_URL").expect("FEED_WS_URL must be set in .env");
    println!("Connecting to: {}\n", url);

    let client = FeedClient::new(&url, FeedClientOptions::default())?;

    let mut states = client.watch_state();
    let status_client = client.clone();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            let attempts = status_client.reconnect_attempts();
            match status_client.last_error() {
                Some(err) => println!("[{}] attempt {}: {}", state, attempts, err),
                None => println!("[{}]", state),
            }
        }
    });

    client
        .on_message(|msg| println!("{}: {}", msg.author, msg.content))
        .await;

    client.connect().await?;

    tokio::signal::ctrl_c().await?;
    client.disconnect().await?;
    println!("\nHistory held {} messages", client.messages().await.len());

    Ok(())
}
