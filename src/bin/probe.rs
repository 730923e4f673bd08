//! mcprobe Binary
//!
//! Runs the conformance suite against a memcache-style server.

use clap::Parser;
use mcprobe::{Config, Runner, TransportKind};
use tracing_subscriber::{fmt, EnvFilter};

/// memcache protocol tests
#[derive(Parser, Debug)]
#[command(name = "mcprobe")]
#[command(about = "Protocol conformance tests for memcache-style servers")]
#[command(version)]
struct Args {
    /// Server address in <host>:<port> format
    #[arg(short, long, default_value = "localhost:11211")]
    server: String,

    /// Use the UDP protocol
    #[arg(short = 'U', long)]
    udp: bool,

    /// Socket read/write timeout in milliseconds (0 waits forever)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Only run scenarios whose name contains this string
    #[arg(short, long)]
    filter: Option<String>,
}

fn main() {
    // Initialize tracing/logging; stdout carries the report
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mcprobe=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let transport = if args.udp {
        TransportKind::Datagram
    } else {
        TransportKind::Stream
    };

    tracing::info!("mcprobe v{}", mcprobe::VERSION);
    tracing::info!("Server: {} over {}", args.server, transport);

    // Build config from args
    let config = Config::builder()
        .server_addr(&args.server)
        .transport(transport)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    let mut runner = match Runner::new(&config) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to set up runner: {}", e);
            std::process::exit(2);
        }
    };

    if let Some(pattern) = &args.filter {
        runner = runner.filter(pattern);
    }

    let report = runner.run_with(|result| println!("{}", result));
    println!("{}", report);

    if !report.is_success() {
        std::process::exit(1);
    }
}
