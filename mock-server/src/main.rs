use mock_server::Credentials;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let defaults = Credentials::default();
    let credentials = Credentials {
        engine_code: std::env::var("H3YUN_ENGINE_CODE").unwrap_or(defaults.engine_code),
        engine_secret: std::env::var("H3YUN_ENGINE_SECRET").unwrap_or(defaults.engine_secret),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, engine_code = %credentials.engine_code, "mock platform listening");
    mock_server::run_with(listener, credentials).await
}
