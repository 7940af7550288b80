//! Repository integration tests.
//!
//! Run every repository operation against an in-memory SQLite database with
//! the real migrations applied.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use user_role_store::config::{Config, IN_MEMORY_DATABASE_URL};
use user_role_store::domain::{Role, User};
use user_role_store::errors::AppError;
use user_role_store::infra::{Database, Persistence, Repository, RoleStore, UserStore};

// =============================================================================
// Helpers
// =============================================================================

async fn setup_db() -> Database {
    let config = Config::with_database_url(IN_MEMORY_DATABASE_URL);
    Database::connect(&config)
        .await
        .expect("Failed to set up in-memory database")
}

async fn setup_stores() -> (UserStore, RoleStore) {
    let db = setup_db().await;
    (
        UserStore::new(db.connection()),
        RoleStore::new(db.connection()),
    )
}

fn timestamp(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 15, 0)
        .unwrap()
}

fn new_user(name: &str) -> User {
    let mut user = User::new();
    user.set_name(Some(name.to_string()));
    user
}

async fn stored_role(roles: &RoleStore, name: &str) -> Role {
    roles.save(Role::named(name)).await.unwrap()
}

fn role_names(user: &User) -> Vec<String> {
    let mut names: Vec<String> = user
        .roles()
        .expect("roles should be loaded")
        .iter()
        .filter_map(|role| role.name().map(str::to_owned))
        .collect();
    names.sort();
    names
}

// =============================================================================
// Save / find
// =============================================================================

#[tokio::test]
async fn test_save_new_user_assigns_id_and_keeps_columns() {
    let (users, _) = setup_stores().await;

    let mut user = new_user("alice");
    user.set_password(Some("plain-text".to_string()));
    user.set_enabled(Some(true));
    user.set_created_date(Some(timestamp(1, 8)));
    user.set_last_login(Some(timestamp(2, 17)));

    let saved = users.save(user).await.unwrap();
    let id = saved.id().expect("id should be generated");

    let found = users.find_by_id(id).await.unwrap().expect("user should exist");
    assert_eq!(found.id(), Some(id));
    assert_eq!(found.name(), Some("alice"));
    assert_eq!(found.password(), Some("plain-text"));
    assert_eq!(found.enabled(), Some(true));
    assert_eq!(found.created_date(), Some(timestamp(1, 8)));
    assert_eq!(found.last_login(), Some(timestamp(2, 17)));
    assert_eq!(found.roles(), Some(&HashSet::new()));
}

#[tokio::test]
async fn test_save_user_with_nothing_set() {
    let (users, _) = setup_stores().await;

    let saved = users.save(User::new()).await.unwrap();

    assert!(saved.id().is_some());
    assert_eq!(saved.name(), None);
    assert_eq!(saved.password(), None);
    assert_eq!(saved.enabled(), None);
    assert_eq!(saved.created_date(), None);
    assert_eq!(saved.last_login(), None);
}

#[tokio::test]
async fn test_generated_ids_are_unique() {
    let (users, _) = setup_stores().await;

    let first = users.save(new_user("alice")).await.unwrap();
    let second = users.save(new_user("alice")).await.unwrap();

    assert_ne!(first.id(), second.id());
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_find_by_id_missing_returns_none() {
    let (users, _) = setup_stores().await;

    assert!(users.find_by_id(404).await.unwrap().is_none());
    assert!(!users.exists_by_id(404).await.unwrap());
}

#[tokio::test]
async fn test_update_existing_user() {
    let (users, _) = setup_stores().await;
    let mut saved = users.save(new_user("alice")).await.unwrap();
    let id = saved.id().unwrap();

    saved.set_name(Some("alice smith".to_string()));
    saved.set_enabled(Some(false));
    let updated = users.save(saved).await.unwrap();

    assert_eq!(updated.id(), Some(id));
    let found = users.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.name(), Some("alice smith"));
    assert_eq!(found.enabled(), Some(false));
    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_can_clear_columns() {
    let (users, _) = setup_stores().await;
    let mut user = new_user("alice");
    user.set_last_login(Some(timestamp(3, 9)));
    let mut saved = users.save(user).await.unwrap();

    saved.set_name(None);
    saved.set_last_login(None);
    let updated = users.save(saved).await.unwrap();

    assert_eq!(updated.name(), None);
    assert_eq!(updated.last_login(), None);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (users, _) = setup_stores().await;

    let mut ghost = new_user("ghost");
    ghost.set_id(Some(999));

    let result = users.save(ghost).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(users.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_found_user_equals_saved_user() {
    let (users, _) = setup_stores().await;
    let saved = users.save(new_user("alice")).await.unwrap();

    let mut found = users.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
    found.set_name(Some("changed locally".to_string()));

    assert_eq!(found, saved);
}

// =============================================================================
// Roles (USER_ROLES)
// =============================================================================

#[tokio::test]
async fn test_save_user_links_roles() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;
    let member = stored_role(&roles, "MEMBER").await;

    let mut user = new_user("alice");
    user.set_roles(Some([admin, member].into_iter().collect()));
    let saved = users.save(user).await.unwrap();

    assert_eq!(role_names(&saved), vec!["ADMIN", "MEMBER"]);

    let found = users.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(role_names(&found), vec!["ADMIN", "MEMBER"]);
}

#[tokio::test]
async fn test_save_replaces_role_set() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;
    let member = stored_role(&roles, "MEMBER").await;
    let auditor = stored_role(&roles, "AUDITOR").await;

    let mut user = new_user("alice");
    user.set_roles(Some([admin, member.clone()].into_iter().collect()));
    let mut saved = users.save(user).await.unwrap();

    saved.set_roles(Some([member, auditor].into_iter().collect()));
    let updated = users.save(saved).await.unwrap();

    assert_eq!(role_names(&updated), vec!["AUDITOR", "MEMBER"]);
}

#[tokio::test]
async fn test_empty_role_set_removes_links() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;

    let mut user = new_user("alice");
    user.set_roles(Some([admin].into_iter().collect()));
    let mut saved = users.save(user).await.unwrap();

    saved.set_roles(Some(HashSet::new()));
    let updated = users.save(saved).await.unwrap();

    assert!(role_names(&updated).is_empty());
    assert_eq!(roles.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unset_roles_leave_links_untouched() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;

    let mut user = new_user("alice");
    user.set_roles(Some([admin].into_iter().collect()));
    let mut saved = users.save(user).await.unwrap();

    saved.set_roles(None);
    saved.set_name(Some("renamed".to_string()));
    let updated = users.save(saved).await.unwrap();

    assert_eq!(updated.name(), Some("renamed"));
    assert_eq!(role_names(&updated), vec!["ADMIN"]);
}

#[tokio::test]
async fn test_unsaved_role_rejects_save_and_writes_nothing() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;

    let mut user = new_user("alice");
    user.set_roles(Some([admin, Role::named("GUEST")].into_iter().collect()));

    let result = users.save(user).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(users.count().await.unwrap(), 0);
    assert_eq!(roles.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_roles_are_shared_between_users() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;

    let mut alice = new_user("alice");
    alice.set_roles(Some([admin.clone()].into_iter().collect()));
    let mut bob = new_user("bob");
    bob.set_roles(Some([admin].into_iter().collect()));

    let saved = users.save_all(vec![alice, bob]).await.unwrap();

    assert_eq!(saved.len(), 2);
    for user in &saved {
        assert_eq!(role_names(user), vec!["ADMIN"]);
    }
    assert_eq!(roles.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_role_id_rejects_save() {
    let (users, roles) = setup_stores().await;
    let mut ghost = Role::named("GHOST");
    ghost.set_id(Some(999));

    let mut user = new_user("alice");
    user.set_roles(Some([ghost].into_iter().collect()));

    let result = users.save(user).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(users.count().await.unwrap(), 0);
    assert_eq!(roles.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_save_all_is_all_or_nothing() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;

    let mut alice = new_user("alice");
    alice.set_roles(Some([admin].into_iter().collect()));
    let mut bob = new_user("bob");
    bob.set_roles(Some([Role::named("GUEST")].into_iter().collect()));

    let result = users.save_all(vec![alice, bob]).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(users.count().await.unwrap(), 0);
    assert_eq!(roles.count().await.unwrap(), 1);
}

// =============================================================================
// Find all / count / exists
// =============================================================================

#[tokio::test]
async fn test_find_all_count_and_exists() {
    let (users, _) = setup_stores().await;
    assert!(users.find_all().await.unwrap().is_empty());
    assert_eq!(users.count().await.unwrap(), 0);

    let saved = users
        .save_all(vec![new_user("alice"), new_user("bob"), new_user("carol")])
        .await
        .unwrap();

    let all = users.find_all().await.unwrap();
    let names: Vec<_> = all.iter().map(|u| u.name().unwrap().to_string()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
    assert_eq!(users.count().await.unwrap(), 3);
    assert!(users.exists_by_id(saved[1].id().unwrap()).await.unwrap());
}

#[tokio::test]
async fn test_find_all_by_id_skips_unknown_keys() {
    let (users, _) = setup_stores().await;
    let saved = users
        .save_all(vec![new_user("alice"), new_user("bob"), new_user("carol")])
        .await
        .unwrap();

    let wanted = vec![saved[2].id().unwrap(), 12345, saved[0].id().unwrap()];
    let found = users.find_all_by_id(wanted).await.unwrap();

    let names: Vec<_> = found.iter().map(|u| u.name().unwrap().to_string()).collect();
    assert_eq!(names, vec!["alice", "carol"]);
    assert!(users.find_all_by_id(Vec::new()).await.unwrap().is_empty());
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_by_id_removes_user_and_links() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;

    let mut user = new_user("alice");
    user.set_roles(Some([admin.clone()].into_iter().collect()));
    let saved = users.save(user).await.unwrap();
    let id = saved.id().unwrap();

    users.delete_by_id(id).await.unwrap();

    assert!(users.find_by_id(id).await.unwrap().is_none());
    // Role survives and, with no links left, can be deleted
    assert_eq!(roles.count().await.unwrap(), 1);
    roles.delete(&admin).await.unwrap();
    assert_eq!(roles.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_linked_role_surfaces_constraint_error() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;
    let role_id = admin.id().unwrap();

    let mut user = new_user("alice");
    user.set_roles(Some([admin].into_iter().collect()));
    let saved = users.save(user).await.unwrap();

    let result = roles.delete_by_id(role_id).await;
    assert!(matches!(result, Err(AppError::Database(_))));

    // Role and link are both still there
    assert!(roles.exists_by_id(role_id).await.unwrap());
    let found = users.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(role_names(&found), vec!["ADMIN"]);
}

#[tokio::test]
async fn test_delete_by_id_missing_is_not_found() {
    let (users, _) = setup_stores().await;

    let result = users.delete_by_id(77).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_delete_record() {
    let (users, _) = setup_stores().await;
    let saved = users.save(new_user("alice")).await.unwrap();
    users.save(new_user("bob")).await.unwrap();

    users.delete(&saved).await.unwrap();

    assert_eq!(users.count().await.unwrap(), 1);
    // Already gone: ignored
    users.delete(&saved).await.unwrap();
}

#[tokio::test]
async fn test_delete_unsaved_record_is_noop() {
    let (users, _) = setup_stores().await;
    users.save(new_user("alice")).await.unwrap();

    users.delete(&new_user("never saved")).await.unwrap();

    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_all_users_then_roles() {
    let (users, roles) = setup_stores().await;
    let admin = stored_role(&roles, "ADMIN").await;
    let member = stored_role(&roles, "MEMBER").await;

    let mut alice = new_user("alice");
    alice.set_roles(Some([admin, member].into_iter().collect()));
    users.save_all(vec![alice, new_user("bob")]).await.unwrap();

    users.delete_all().await.unwrap();
    assert_eq!(users.count().await.unwrap(), 0);

    roles.delete_all().await.unwrap();
    assert_eq!(roles.count().await.unwrap(), 0);
}

// =============================================================================
// Role repository
// =============================================================================

#[tokio::test]
async fn test_role_crud() {
    let (_, roles) = setup_stores().await;

    let mut saved = roles.save(Role::named("ADMIN")).await.unwrap();
    let id = saved.id().unwrap();

    saved.set_name(Some("ADMINISTRATOR".to_string()));
    roles.save(saved).await.unwrap();

    let found = roles.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.name(), Some("ADMINISTRATOR"));

    roles.delete_by_id(id).await.unwrap();
    assert!(!roles.exists_by_id(id).await.unwrap());
}

// =============================================================================
// Wiring and database
// =============================================================================

#[tokio::test]
async fn test_persistence_shares_one_connection() {
    let db = setup_db().await;
    let persistence = Persistence::new(db.connection());

    let role = persistence.roles().save(Role::named("ADMIN")).await.unwrap();
    let mut user = new_user("alice");
    user.set_roles(Some([role].into_iter().collect()));
    let saved = persistence.users().save(user).await.unwrap();

    let found = persistence
        .users()
        .find_by_id(saved.id().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(role_names(&found), vec!["ADMIN"]);
}

#[tokio::test]
async fn test_database_ping_and_migration_status() {
    let db = setup_db().await;

    db.ping().await.unwrap();

    let status = db.migration_status().await.unwrap();
    assert_eq!(status.len(), 3);
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[tokio::test]
async fn test_migrate_down_and_fresh() {
    let db = setup_db().await;
    let users = UserStore::new(db.connection());
    users.save(new_user("alice")).await.unwrap();

    db.migrate_down().await.unwrap();
    let status = db.migration_status().await.unwrap();
    let pending: Vec<_> = status.iter().filter(|(_, applied)| !applied).collect();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].0.contains("user_roles"));

    db.migrate_fresh().await.unwrap();
    assert!(db.migration_status().await.unwrap().iter().all(|(_, applied)| *applied));
    assert_eq!(users.count().await.unwrap(), 0);
}
