//! Interactive command-line client.
//!
//! Reads whitespace/punctuation-separated tokens from stdin, ships them as a
//! JSON array frame, and prints replies as they arrive. Replies are handled
//! by a separate task so pipelined input keeps flowing.

use anyhow::Result;
use bytes::BytesMut;
use emberkv::protocol::{decode_request, extract, tokenize};
use emberkv::{DEFAULT_HOST, DEFAULT_PORT, VERSION};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<()> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("{DEFAULT_HOST}:{DEFAULT_PORT}"));
    let stream = TcpStream::connect(&addr).await?;
    println!("emberkv-cli {VERSION} connected to {addr}");
    let (mut reader, mut writer) = stream.into_split();

    tokio::spawn(async move {
        let mut buf = BytesMut::new();
        loop {
            while let Some(frame) = extract(&mut buf) {
                match decode_request(&frame) {
                    Some(values) => println!("> {}", values.join(" ")),
                    None => println!("> (unreadable reply)"),
                }
            }
            match reader.read_buf(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
        println!("server closed the connection");
        std::process::exit(0);
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let tokens = tokenize(&line);
        let Some(first) = tokens.first() else {
            continue;
        };
        if first.eq_ignore_ascii_case("quit") || first.eq_ignore_ascii_case("exit") {
            break;
        }
        let payload = serde_json::to_string(&tokens)?;
        writer.write_all(payload.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
