//! Roles command - Print stored roles as JSON.

use crate::cli::args::{RolesAction, RolesArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};

/// Execute the roles command
pub async fn execute(args: RolesArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let persistence = Persistence::new(db.connection());

    println!("{}", render(args.action, &persistence).await?);
    Ok(())
}

/// Produce the JSON output for a roles action
pub async fn render(action: RolesAction, persistence: &Persistence) -> AppResult<String> {
    match action {
        RolesAction::List => {
            let roles = persistence.roles().find_all().await?;
            serde_json::to_string_pretty(&roles)
                .map_err(|e| AppError::internal(format!("JSON encoding failed: {}", e)))
        }
    }
}
