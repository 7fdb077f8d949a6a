use std::net::SocketAddr;

use perfume_store::config::{Config, LogFormat};
use perfume_store::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "perfume_store=debug,tower_http=debug".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let db = perfume_store::db::pool::connect(&config).await?;
    tracing::info!("Connected to database");

    perfume_store::db::migration::run(&db).await?;
    tracing::info!("Migrations applied");

    // cargo run -- seed <email> [password]
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "seed" {
        let email = args
            .get(2)
            .map(|s| s.as_str())
            .unwrap_or("admin@example.com");
        let password = args.get(3).map(|s| s.as_str());

        println!("=== Perfume Store Bootstrap ===\n");

        let result = perfume_store::seed::bootstrap(&db, email, password).await?;

        match result.user_action.as_str() {
            "created" => println!("Created admin user: {email}"),
            "promoted" => println!("Promoted {email} to admin role."),
            "already_admin" => println!("User {email} is already an admin."),
            _ => {}
        }
        if result.perfumes_added > 0 {
            println!("Added {} perfumes to the catalog.", result.perfumes_added);
        } else {
            println!("Catalog already stocked, no perfumes added.");
        }

        println!("\n=== Bootstrap complete ===");
        return Ok(());
    }

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;

    let state = AppState::new(db, config);
    let app = perfume_store::routes::create_router(state);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
