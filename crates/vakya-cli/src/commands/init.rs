//! The `vakya init` command.

use std::path::Path;

use anyhow::Result;

use vakya_client::config::STARTER_CONFIG;

pub fn execute() -> Result<()> {
    if Path::new("vakya.toml").exists() {
        println!("vakya.toml already exists, skipping.");
    } else {
        std::fs::write("vakya.toml", STARTER_CONFIG)?;
        println!("Created vakya.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point auth_url and sentence_url at your services in vakya.toml");
    println!("  2. Run: vakya register --name <name> --email <email> --password <pw> --confirm-password <pw>");
    println!("  3. Run: vakya play");

    Ok(())
}
