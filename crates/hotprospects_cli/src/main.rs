//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `hotprospects_core` linkage.
//! - Preview a self-card QR in the terminal: `hotprospects_cli <name> <email>`.

use hotprospects_core::qr::render_terminal;
use hotprospects_core::UserProfile;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("hotprospects_core ping={}", hotprospects_core::ping());
    println!(
        "hotprospects_core version={}",
        hotprospects_core::core_version()
    );

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let [name, email_address] = args.as_slice() else {
        if !args.is_empty() {
            eprintln!("usage: hotprospects_cli [<name> <email>]");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    let profile = UserProfile::new(name.clone(), email_address.clone());
    match render_terminal(&profile.qr_payload()) {
        Ok(card) => {
            println!("{card}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to render self-card: {err}");
            ExitCode::FAILURE
        }
    }
}
