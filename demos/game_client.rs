//! Game client example.
//!
//! Shows how a game script obtains a key after the verification steps and
//! checks it on later launches.
//!
//! # Running
//!
//! ```bash
//! cargo run --bin keygate &
//! export KEYGATE_URL="http://127.0.0.1:8080"
//! cargo run --example game_client              # issue a new key
//! GAME_KEY=ABCD1234EFGH5678 cargo run --example game_client   # check a saved one
//! ```

use keygate::client::http::KeyGateClient;
use keygate::{ClientConfig, KeyGateError, KeyStatus};

fn main() {
    let base_url =
        std::env::var("KEYGATE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

    let mut config = ClientConfig::new(base_url);
    config.user_agent_product = "example-game".to_string();

    let client = match KeyGateClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // A key saved from an earlier session, if any.
    let key = match std::env::var("GAME_KEY") {
        Ok(key) => key,
        Err(_) => match client.generate_key() {
            Ok(issued) => {
                println!("Issued key {}", issued.key);
                println!("  Expires at (ms): {}", issued.expires_at);
                issued.key
            }
            Err(e) => {
                eprintln!("Could not obtain a key: {}", e);
                std::process::exit(1);
            }
        },
    };

    match client.verify_key(&key) {
        Ok(KeyStatus::Valid) => println!("✓ Key valid, features unlocked"),
        Ok(KeyStatus::Expired) => {
            println!("✗ Key expired, complete the verification steps again");
            std::process::exit(2);
        }
        Ok(KeyStatus::Invalid) => {
            println!("✗ Key not recognised");
            std::process::exit(2);
        }
        Err(e) => {
            match &e {
                KeyGateError::MissingKey => eprintln!("GAME_KEY is empty"),
                KeyGateError::Transport(_) => eprintln!("Server unreachable: {}", e),
                _ => eprintln!("Verification error: {}", e),
            }
            std::process::exit(1);
        }
    }
}
