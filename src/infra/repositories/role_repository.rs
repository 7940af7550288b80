//! Role repository binding.

use async_trait::async_trait;
use sea_orm::{ActiveValue::NotSet, ActiveValue::Set, ActiveValue::Unchanged};

use super::base::{EntityMapping, Repository, SeaRepository};
use super::entities::role::{self, ActiveModel, Entity as RoleEntity, Model};
use crate::config::TABLE_ROLE;
use crate::domain::Role;

/// Repository for [`Role`] records keyed by `i64`.
pub trait RoleRepository: Repository<Role, i64> {}

impl<R: Repository<Role, i64>> RoleRepository for R {}

/// SeaORM-backed role repository
pub type RoleStore = SeaRepository<Role>;

/// Convert database model to domain entity
impl From<Model> for Role {
    fn from(model: Model) -> Self {
        let mut role = Role::new();
        role.set_id(Some(model.id));
        role.set_name(model.name);
        role
    }
}

#[async_trait]
impl EntityMapping for Role {
    type Entity = RoleEntity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Key = i64;

    const TABLE: &'static str = TABLE_ROLE;

    fn key_column() -> role::Column {
        role::Column::Id
    }

    fn key(&self) -> Option<i64> {
        self.id()
    }

    fn key_of(model: &Model) -> i64 {
        model.id
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: self.id().map_or(NotSet, Unchanged),
            name: Set(self.name().map(str::to_owned)),
        }
    }

    fn from_model(model: Model) -> Self {
        Role::from(model)
    }
}
