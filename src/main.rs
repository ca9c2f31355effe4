//! Netglance - desktop network throughput overlay
//!
//! Entry point for the overlay and system tray application.

use anyhow::Result;
use netglance::app::{self, AppOptions};
use netglance::net::counters::NetCounters;
use netglance::ui::format::format_speed;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("netglance=info".parse().unwrap()),
        )
        .init();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!(
        "║        Netglance v{} - Network Throughput Overlay       ║",
        netglance::VERSION
    );
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut options = AppOptions::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--list" | "-l" => {
                list_interfaces();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("netglance {}", netglance::VERSION);
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--interval" | "-n" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --interval requires a value in milliseconds");
                    return Ok(());
                }
                if let Err(e) = options.set_interval_ms(&args[i + 1]) {
                    eprintln!("Error: {e}");
                    return Ok(());
                }
                i += 2;
                continue;
            }
            "--position" | "-p" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --position requires a value of the form X,Y");
                    return Ok(());
                }
                if let Err(e) = options.set_position(&args[i + 1]) {
                    eprintln!("Error: {e}");
                    return Ok(());
                }
                i += 2;
                continue;
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                return Ok(());
            }
        }
    }

    app::run(options)
}

fn print_help() {
    println!("Usage: netglance [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -l, --list              List network interfaces and their totals");
    println!("  -n, --interval MS       Poll interval in milliseconds (default: 1000)");
    println!("  -p, --position X,Y      Initial overlay position (default: 100,100)");
    println!("  -v, --version           Show version");
    println!("  -h, --help              Show this help");
    println!();
    println!("Examples:");
    println!("  netglance -n 500 -p 20,20");
    println!("  netglance --list");
    println!();
    println!("Without arguments, starts the overlay at the default position.");
}

fn list_interfaces() {
    println!("Scanning network interfaces...");
    println!();

    let mut counters = NetCounters::new();
    let interfaces = counters.interfaces();
    if interfaces.is_empty() {
        println!("No network interfaces found.");
        return;
    }

    println!("Found {} interface(s):", interfaces.len());
    println!();
    for (i, (name, totals)) in interfaces.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
        println!("     Sent:     {}", format_speed(totals.bytes_sent as f64));
        println!("     Received: {}", format_speed(totals.bytes_recv as f64));
        println!();
    }
}
