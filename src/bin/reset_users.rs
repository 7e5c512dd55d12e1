//! Restore the default operator credentials (`admin` / `password`).
//!
//! Overwrites the credential file in the configured data directory. Meant
//! for the case where the operator has forgotten the password.

use agenda_lib::config::AppConfig;
use agenda_lib::crypto::{CredentialStore, DEFAULT_PASSWORD, DEFAULT_USERNAME};

fn main() {
    agenda_lib::init_tracing();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    CredentialStore::new(config.users_path()).reset_defaults()?;
    println!("Credenziali ripristinate: {DEFAULT_USERNAME} / {DEFAULT_PASSWORD}");
    Ok(())
}
