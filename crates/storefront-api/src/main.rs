use storefront_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (catalog store, storage, routes)
    let (_state, router) = storefront_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    storefront_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
