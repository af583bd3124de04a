use std::path::Path;

#[tokio::main]
async fn main() {
    felis_server::init_logging();

    match felis_server::run(Path::new(".")).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("Bootstrap failed: {}", e);
            std::process::exit(1);
        }
    }
}
