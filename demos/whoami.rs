//! Basic authentication example.
//!
//! Authenticates with Sophos Central, prints the resolved tenant and
//! lists the first page of endpoints.
//!
//! Run with: cargo run --example whoami

use sophos_central::{ApiResponse, RequestOptions, TenantSession};

fn main() -> sophos_central::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let client_id = std::env::var("SOPHOS_CLIENT_ID")
        .expect("SOPHOS_CLIENT_ID environment variable required");
    let client_secret = std::env::var("SOPHOS_CLIENT_SECRET")
        .expect("SOPHOS_CLIENT_SECRET environment variable required");

    println!("Connecting to Sophos Central...");

    let mut session = TenantSession::connect(client_id, client_secret)?;

    println!("Successfully authenticated!");
    println!("  Tenant:  {} ({})", session.tenant_id(), session.id_type());
    println!("  Host:    {}", session.api_host());
    println!("  Expires: {}", session.token_expires_at());

    let options = RequestOptions::new().query("pageSize", 10);
    match session.get("/endpoint/v1/endpoints", options) {
        ApiResponse::Success { data } => {
            let items = data["items"].as_array().map(Vec::len).unwrap_or(0);
            println!("\nFound {} endpoint(s) on the first page", items);
            for item in data["items"].as_array().into_iter().flatten() {
                println!(
                    "  - {} ({})",
                    item["hostname"].as_str().unwrap_or("unknown"),
                    item["type"].as_str().unwrap_or("unknown")
                );
            }
        }
        ApiResponse::Error { error, details } => {
            eprintln!("\n{}: {}", error, details);
        }
    }

    session.close();
    println!("\nDone!");
    Ok(())
}
