// User retirement. Best-effort and forward-only: deactivation is persisted
// first, so a failure in a later stage still leaves the account unusable.
// Completed stages are never rolled back.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::percolate::PercolateStore;
use crate::database::models::social_auth::SocialAuthStore;
use crate::database::models::user::{User, UserStore};
use crate::search::SearchClient;

/// Exactly one identifying key is accepted.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct RetireUserArgs {
    #[arg(long, help = "Retire the user with this id")]
    pub user_id: Option<Uuid>,

    #[arg(long, help = "Retire the user with this username")]
    pub username: Option<String>,

    #[arg(long, help = "Retire the user with this email address")]
    pub email: Option<String>,
}

pub async fn execute(args: RetireUserArgs) -> Result<()> {
    let pool = DatabaseManager::pool().await?;
    let search = SearchClient::new(&config::config().search);
    run_retirement(args, pool, search).await
}

/// The retirement cascade itself, with its dependencies handed in so the
/// stages can run against any pool and index.
pub async fn run_retirement(
    args: RetireUserArgs,
    pool: PgPool,
    search: SearchClient,
) -> Result<()> {
    let users = UserStore::new(pool.clone());

    let user = lookup(&users, &args).await?;
    println!("Retiring user {} ({})", user.username, user.id);

    users
        .retire(user.id)
        .await
        .context("failed to deactivate account")?;
    println!("Cleared email, deactivated account, set unusable password");

    let social = SocialAuthStore::new(pool.clone())
        .delete_for_user(user.id)
        .await
        .context("failed to delete social auth records")?;
    println!("Deleted {} social auth record(s)", social);

    let subscriptions = PercolateStore::new(pool)
        .unsubscribe_all(user.id)
        .await
        .context("failed to remove percolate subscriptions")?;
    println!("Removed {} percolate subscription(s)", subscriptions);

    search
        .delete_profile(user.id)
        .await
        .context("failed to remove user from the search index")?;
    println!("Removed user from the search index");

    println!("Retirement of {} complete", user.username);
    Ok(())
}

async fn lookup(users: &UserStore, args: &RetireUserArgs) -> Result<User> {
    let found = if let Some(id) = args.user_id {
        users.find_by_id(id).await?
    } else if let Some(username) = &args.username {
        users.find_by_username(username).await?
    } else if let Some(email) = &args.email {
        users.find_by_email(email).await?
    } else {
        // clap's arg group guarantees one key is present
        unreachable!("argument group enforces exactly one key")
    };

    found.ok_or_else(|| anyhow!("No user matches the given key"))
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn accepts_exactly_one_key() {
        let cli = Cli::try_parse_from(["atrium", "retire-user", "--username", "bob"]).unwrap();
        let Commands::RetireUser(args) = cli.command;
        assert_eq!(args.username.as_deref(), Some("bob"));
        assert!(args.user_id.is_none());
        assert!(args.email.is_none());
    }

    #[test]
    fn rejects_missing_key() {
        assert!(Cli::try_parse_from(["atrium", "retire-user"]).is_err());
    }

    #[test]
    fn rejects_multiple_keys() {
        let result = Cli::try_parse_from([
            "atrium",
            "retire-user",
            "--username",
            "bob",
            "--email",
            "bob@example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn user_id_must_be_a_uuid() {
        assert!(Cli::try_parse_from(["atrium", "retire-user", "--user-id", "42"]).is_err());
    }
}
