use crate::support::print_json;
use schedconf_store::write_new_config;
use serde_json::json;
use std::path::PathBuf;

pub fn run(config: String, json_output: bool) {
    let path = PathBuf::from(config);
    let created = write_new_config(&path).unwrap_or_else(|e| {
        eprintln!("error: failed to initialize {}: {e}", path.display());
        std::process::exit(1);
    });

    if json_output {
        print_json(&json!({
            "action": "init",
            "configPath": path.display().to_string(),
            "limit": created.limit,
        }));
    } else {
        println!(
            "schedconf init\n  Created: {}\n  Schedule limit: {}",
            path.display(),
            created.limit
        );
    }
}
