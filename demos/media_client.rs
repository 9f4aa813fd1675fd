//! Interactive client demo
//!
//! Run with: cargo run --example media_client [HOST] [PORT]
//!
//! Reads requests from stdin, sends each as one line and prints the
//! one-line response. Exits when the server closes the session.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use mediatheque::server::config::DEFAULT_PORT;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port = match args.next() {
        Some(p) => p.parse::<u16>()?,
        None => DEFAULT_PORT,
    };

    let stream = match TcpStream::connect((host.as_str(), port)).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Client: couldn't connect to {}:{}: {}", host, port, e);
            std::process::exit(1);
        }
    };
    println!("Client connected to {}:{}", host, port);

    let (rd, mut wr) = stream.into_split();
    let mut responses = BufReader::new(rd).lines();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Request: ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(request) = stdin.next_line().await? else {
            break;
        };

        wr.write_all(request.as_bytes()).await?;
        wr.write_all(b"\n").await?;

        match responses.next_line().await? {
            Some(response) => println!("Response: {}", response),
            None => {
                println!("Server closed the session");
                break;
            }
        }
    }

    Ok(())
}
