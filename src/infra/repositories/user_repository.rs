//! User repository binding and the `USER_ROLES` relation.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait,
    DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use super::base::{EntityMapping, Repository, SeaRepository};
use super::entities::{role, user, user_role};
use crate::config::TABLE_USER;
use crate::domain::{Role, User};
use crate::errors::{AppError, AppResult};

/// Repository for [`User`] records keyed by `i64`.
///
/// Adds nothing to the generic operations; any `Repository<User, i64>`
/// (the SeaORM store, a mock) is a `UserRepository`.
pub trait UserRepository: Repository<User, i64> {}

impl<R: Repository<User, i64>> UserRepository for R {}

/// SeaORM-backed user repository
pub type UserStore = SeaRepository<User>;

/// Convert database model to domain entity (roles are loaded separately)
impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        let mut user = User::new();
        user.set_id(Some(model.id));
        user.set_name(model.name);
        user.set_password(model.password);
        user.set_enabled(model.enabled);
        user.set_created_date(model.created_date);
        user.set_last_login(model.last_login);
        user
    }
}

/// Role ids to link, rejecting roles without an id
fn role_ids(user: &User) -> AppResult<Option<BTreeSet<i64>>> {
    let Some(roles) = user.roles() else {
        return Ok(None);
    };

    roles
        .iter()
        .map(|role| {
            role.id().ok_or_else(|| {
                AppError::validation(format!(
                    "Role '{}' must be saved before it is assigned",
                    role.name().unwrap_or_default()
                ))
            })
        })
        .collect::<AppResult<BTreeSet<i64>>>()
        .map(Some)
}

#[async_trait]
impl EntityMapping for User {
    type Entity = user::Entity;
    type Model = user::Model;
    type ActiveModel = user::ActiveModel;
    type Key = i64;

    const TABLE: &'static str = TABLE_USER;

    fn key_column() -> user::Column {
        user::Column::Id
    }

    fn key(&self) -> Option<i64> {
        self.id()
    }

    fn key_of(model: &user::Model) -> i64 {
        model.id
    }

    fn to_active_model(&self) -> user::ActiveModel {
        user::ActiveModel {
            id: self.id().map_or(NotSet, Unchanged),
            name: Set(self.name().map(str::to_owned)),
            password: Set(self.password().map(str::to_owned)),
            enabled: Set(self.enabled()),
            created_date: Set(self.created_date()),
            last_login: Set(self.last_login()),
        }
    }

    fn from_model(model: user::Model) -> Self {
        User::from(model)
    }

    async fn load_relations(&mut self, db: &DatabaseConnection) -> AppResult<()> {
        let Some(id) = self.id() else {
            return Ok(());
        };

        let roles = role::Entity::find()
            .inner_join(user_role::Entity)
            .filter(user_role::Column::UserId.eq(id))
            .order_by_asc(role::Column::Id)
            .all(db)
            .await?;

        self.set_roles(Some(roles.into_iter().map(Role::from).collect()));
        Ok(())
    }

    /// Replace the user's join rows with the current role set.
    /// `None` roles leave the stored links untouched.
    async fn store_relations(&self, key: i64, txn: &DatabaseTransaction) -> AppResult<()> {
        let Some(ids) = role_ids(self)? else {
            return Ok(());
        };

        let stored = role::Entity::find()
            .filter(role::Column::Id.is_in(ids.iter().copied()))
            .count(txn)
            .await?;
        if stored < ids.len() as u64 {
            return Err(AppError::validation(format!(
                "User {} references roles that are not stored",
                key
            )));
        }

        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(key))
            .exec(txn)
            .await?;

        if ids.is_empty() {
            return Ok(());
        }

        let links = ids.iter().map(|&role_id| user_role::ActiveModel {
            user_id: Set(key),
            role_id: Set(role_id),
        });
        user_role::Entity::insert_many(links)
            .exec_without_returning(txn)
            .await?;

        tracing::debug!(user_id = key, roles = ids.len(), "User roles linked");
        Ok(())
    }

    async fn remove_relations(key: i64, txn: &DatabaseTransaction) -> AppResult<()> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(key))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn remove_all_relations(txn: &DatabaseTransaction) -> AppResult<()> {
        user_role::Entity::delete_many().exec(txn).await?;
        Ok(())
    }
}
