//! Integration tests for the sense-stream firmware.
//!
//! Run after flashing the firmware, with the host attached to the far end of
//! the node's wireless serial link.

mod device;

use clap::Parser;
use colored::Colorize;

use device::LinkClient;
use tests::{print_results, run_all_tests};

#[derive(Parser)]
#[command(name = "integration-tests")]
#[command(about = "Integration tests for the sense-stream firmware")]
struct Args {
    /// Serial port of the link receiver
    #[arg(short, long)]
    port: String,

    /// Baud rate
    #[arg(short, long, default_value = "9600")]
    baud: u32,

    /// Samples per slot the firmware was built with
    #[arg(long, default_value = "32")]
    slot_capacity: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("{}", "Sense-Stream Integration Tests".bold());
    println!("Port: {}", args.port);
    println!("Baud: {}", args.baud);
    println!();

    println!("Connecting to link...");
    let mut link = LinkClient::new(&args.port, args.baud)?;

    // Let the node finish loading its config, then start clean
    std::thread::sleep(std::time::Duration::from_secs(1));
    link.drain()?;
    println!("{}", "Connected!".green());

    println!("\nRunning tests...\n");

    let results = run_all_tests(&mut link, args.slot_capacity);
    print_results(&results);

    // Exit with error code if any tests failed
    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
