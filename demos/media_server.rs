//! Media server demo
//!
//! Run with: cargo run --example media_server [BIND_ADDR] [--headless]
//!
//! Examples:
//!   cargo run --example media_server                    # binds to 0.0.0.0:3331
//!   cargo run --example media_server localhost          # binds to 127.0.0.1:3331
//!   cargo run --example media_server 127.0.0.1:4000     # binds to 127.0.0.1:4000
//!
//! Then talk to it with the client demo or any line-oriented tool:
//!   cargo run --example media_client
//!   nc localhost 3331
//!
//! Requests: `SEARCH <name>`, `PLAY <name>`, `QUIT` (ends your session only).

use std::net::SocketAddr;
use std::sync::Arc;

use mediatheque::server::config::DEFAULT_PORT;
use mediatheque::{MediaRegistry, MediaServer, ServerConfig};

/// Parse bind address from command line argument.
///
/// Accepts "localhost", "localhost:PORT", "IP" and "IP:PORT".
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: media_server [BIND_ADDR] [--headless]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:{})", DEFAULT_PORT);
    eprintln!("  --headless   Never launch a player for PLAY requests");
}

async fn seed(registry: &MediaRegistry) -> mediatheque::Result<()> {
    let photo = registry
        .create_photo("Photo1", "montsouris.jpg", 48.8, 2.3)
        .await;
    let video = registry.create_video("Video1", "video.mp4", 120u32).await;

    let film = registry.create_film("Film1", "film.mkv", 5400u32).await;
    registry.set_chapters(&film, vec![600, 1800, 3600]).await?;

    let group = registry.create_group("Mes Medias").await;
    registry.add_member(&group, &photo).await?;
    registry.add_member(&group, &video).await?;
    registry.add_member(&group, &film).await?;

    tracing::info!(group = %registry.describe_group("Mes Medias").await?, "Seeded registry");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let headless = args.iter().any(|a| a == "--headless");

    let bind_addr = match args.iter().find(|a| !a.starts_with("--")) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => ServerConfig::default().bind_addr,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mediatheque=debug".parse()?)
                .add_directive("media_server=debug".parse()?),
        )
        .init();

    let registry = if headless {
        Arc::new(MediaRegistry::headless())
    } else {
        Arc::new(MediaRegistry::new())
    };
    seed(&registry).await?;

    let server = MediaServer::new(ServerConfig::with_addr(bind_addr), registry);

    println!("Starting media server on {}", server.bind_addr());
    println!("Try: SEARCH Photo1 | PLAY Video1 | QUIT");

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\nShutting down...");
        })
        .await?;

    Ok(())
}
