//! Users command - Print stored users as JSON.

use crate::cli::args::{UsersAction, UsersArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Database, Persistence};

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let persistence = Persistence::new(db.connection());

    println!("{}", render(args.action, &persistence).await?);
    Ok(())
}

/// Produce the JSON output for a users action
pub async fn render(action: UsersAction, persistence: &Persistence) -> AppResult<String> {
    let users = persistence.users();

    let json = match action {
        UsersAction::List => {
            let all = users.find_all().await?;
            tracing::debug!(count = all.len(), "Users loaded");
            serde_json::to_string_pretty(&all)
        }
        UsersAction::Show { id } => {
            let user = users.find_by_id(id).await?.ok_or_not_found()?;
            serde_json::to_string_pretty(&user)
        }
    };

    json.map_err(|e| AppError::internal(format!("JSON encoding failed: {}", e)))
}
