use bulk_email_sender::configuration::get_configuration;
use bulk_email_sender::startup::Application;
use bulk_email_sender::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initializing the subscriber
    let subscriber = get_subscriber("bulk_email_sender".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration()?;
    let application = Application::build(configuration).await?;

    // Bubble up the io::Error if the server stops unexpectedly
    application.run_until_stopped().await?;
    Ok(())
}
