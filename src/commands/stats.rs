//! Stats command - Record counts.

use serde::Serialize;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};

/// Number of stored records per table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub users: u64,
    pub roles: u64,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "users: {}", self.users)?;
        write!(f, "roles: {}", self.roles)
    }
}

/// Execute the stats command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let persistence = Persistence::new(db.connection());

    println!("{}", collect(&persistence).await?);
    Ok(())
}

/// Count records through the repositories
pub async fn collect(persistence: &Persistence) -> AppResult<Stats> {
    Ok(Stats {
        users: persistence.users().count().await?,
        roles: persistence.roles().count().await?,
    })
}
