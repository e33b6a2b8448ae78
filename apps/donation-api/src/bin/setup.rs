//! Interactive creation of an admin account.
//!
//! Usage:
//!   cargo run -p donation-api --bin donation-setup
//!
//! Connects to DATABASE_URL and inserts a new active admin.

use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;

use donation_api::auth::password::{hash_password, MIN_PASSWORD_LEN};
use donation_api::db::postgres::PgStore;
use donation_api::db::store::Store;
use donation_api::models::admin::NewAdmin;

fn prompt(label: &str, default: Option<&str>) -> String {
    match default {
        Some(d) => print!("{label} [{d}]: "),
        None => print!("{label}: "),
    }
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    let input = input.trim();
    if input.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        input.to_string()
    }
}

fn prompt_password() -> String {
    loop {
        print!("Password: ");
        io::stdout().flush().unwrap();
        let password = rpassword::read_password().expect("Failed to read password");
        if password.chars().count() < MIN_PASSWORD_LEN {
            eprintln!("Password must be at least {MIN_PASSWORD_LEN} characters long");
            continue;
        }

        print!("Confirm password: ");
        io::stdout().flush().unwrap();
        let confirm = rpassword::read_password().expect("Failed to read password");
        if confirm == password {
            return password;
        }
        eprintln!("Passwords do not match");
    }
}

#[tokio::main]
async fn main() {
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    println!("=== Donation Admin Setup ===\n");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL env var is required");

    let username = prompt("Username", None);
    if username.is_empty() {
        eprintln!("Username is required");
        std::process::exit(1);
    }
    let default_email = format!("{username}@localhost");
    let email = prompt("Email", Some(&default_email));
    let password = prompt_password();

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("{}", e.message);
            std::process::exit(1);
        }
    };

    let store = PgStore::new(donation_api::db::pool::connect(&database_url).await);
    let created = store
        .insert_admin(NewAdmin {
            username: username.clone(),
            email,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        })
        .await;

    match created {
        Ok(admin) => {
            println!("\n=== Admin created ===");
            println!("  id:       {}", admin.id);
            println!("  username: {}", admin.username);
            println!("  email:    {}", admin.email);
        }
        Err(e) => {
            eprintln!("Failed to create admin: {}", e.message);
            std::process::exit(1);
        }
    }
}
