//! Entry point for the `armory-gateway` HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use armory_core::User;
use armory_gateway::{routes::create_router, state::AppState};
use armory_veil::VeilController;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let addr = std::env::var("ARMORY_LISTEN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_owned());

    let controller = match (std::env::var("VEIL_PATH"), std::env::var("VEIL_OUTPUT_DIR")) {
        (Ok(binary), Ok(output)) => {
            VeilController::new(PathBuf::from(binary), PathBuf::from(output))
        }
        _ => VeilController::with_defaults(),
    };
    let state = AppState::new(Arc::new(controller));

    seed_admin(&state);

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "armory-gateway listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

/// Register the bootstrap user from `ARMORY_ADMIN_USER` /
/// `ARMORY_ADMIN_PASSWORD`, if both are set.
fn seed_admin(state: &AppState) {
    let (Ok(username), Ok(password)) = (
        std::env::var("ARMORY_ADMIN_USER"),
        std::env::var("ARMORY_ADMIN_PASSWORD"),
    ) else {
        return;
    };
    match User::new(username, &password) {
        Ok(user) => {
            info!(user = %user.username, "seeded admin user");
            state.users.insert(user);
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to seed admin user");
            std::process::exit(1);
        }
    }
}
