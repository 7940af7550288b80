//! Generic repository: one CRUD capability set, implemented once.
//!
//! [`Repository`] is the contract every entity repository exposes.
//! [`EntityMapping`] is the hand-written bridge between a domain record and
//! its SeaORM entity, and [`SeaRepository`] implements [`Repository`] for
//! any type that provides such a mapping.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, FromQueryResult, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait,
    QueryFilter, QueryOrder, TransactionTrait, Value,
};

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// CRUD operations over records of type `T` keyed by `K`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Repository<T: Send + Sync + 'static, K: Send + Sync + 'static>: Send + Sync {
    /// Insert a record without a key, update one that has a key.
    ///
    /// Returns the stored record with its relations loaded. Updating a key
    /// that has no row yields `NotFound`.
    ///
    /// The record is re-read after the commit. An error from that read is
    /// returned even though the write itself is already durable.
    async fn save(&self, record: T) -> AppResult<T>;

    /// Save every record in order, in one transaction: either all of them
    /// are written or none is
    async fn save_all(&self, records: Vec<T>) -> AppResult<Vec<T>>;

    /// Find record by primary key
    async fn find_by_id(&self, id: K) -> AppResult<Option<T>>;

    /// Check whether a row with this key exists
    async fn exists_by_id(&self, id: K) -> AppResult<bool>;

    /// Find all records, in key order
    async fn find_all(&self) -> AppResult<Vec<T>>;

    /// Find the records whose key is listed; unknown keys are skipped
    async fn find_all_by_id(&self, ids: Vec<K>) -> AppResult<Vec<T>>;

    /// Count all records
    async fn count(&self) -> AppResult<u64>;

    /// Delete record by primary key, `NotFound` if there is no such row
    async fn delete_by_id(&self, id: K) -> AppResult<()>;

    /// Delete the given record. Unsaved or already removed records are ignored.
    async fn delete(&self, record: &T) -> AppResult<()>;

    /// Delete every record
    async fn delete_all(&self) -> AppResult<()>;
}

/// Explicit field-to-column mapping between a domain record and its entity.
///
/// Relations that are not columns (join tables) go through the hooks, which
/// default to doing nothing.
#[async_trait]
pub trait EntityMapping: Sized + Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: FromQueryResult + IntoActiveModel<Self::ActiveModel> + Send + Sync + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;
    type Key: Copy
        + Debug
        + Send
        + Sync
        + 'static
        + Into<Value>
        + Into<<<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>;

    /// Table name, for logging
    const TABLE: &'static str;

    /// Primary key column
    fn key_column() -> <Self::Entity as EntityTrait>::Column;

    /// Key of the record, `None` until stored
    fn key(&self) -> Option<Self::Key>;

    /// Key of a stored row
    fn key_of(model: &Self::Model) -> Self::Key;

    /// Columns to write. The key must be `NotSet` when absent.
    fn to_active_model(&self) -> Self::ActiveModel;

    /// Record built from a stored row
    fn from_model(model: Self::Model) -> Self;

    /// Fill relations after the record was read
    async fn load_relations(&mut self, _db: &DatabaseConnection) -> AppResult<()> {
        Ok(())
    }

    /// Write relations owned by the record, inside the save transaction
    async fn store_relations(&self, _key: Self::Key, _txn: &DatabaseTransaction) -> AppResult<()> {
        Ok(())
    }

    /// Remove relations owned by one record before its row is deleted
    async fn remove_relations(_key: Self::Key, _txn: &DatabaseTransaction) -> AppResult<()> {
        Ok(())
    }

    /// Remove relations owned by every record before the table is emptied
    async fn remove_all_relations(_txn: &DatabaseTransaction) -> AppResult<()> {
        Ok(())
    }
}

/// SeaORM-backed implementation of [`Repository`] for any mapped record.
pub struct SeaRepository<T> {
    db: DatabaseConnection,
    _record: PhantomData<fn() -> T>,
}

impl<T: EntityMapping> SeaRepository<T> {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    /// Turn a row into a record with its relations loaded
    async fn hydrate(&self, model: T::Model) -> AppResult<T> {
        let mut record = T::from_model(model);
        record.load_relations(&self.db).await?;
        Ok(record)
    }

    async fn hydrate_all(&self, models: Vec<T::Model>) -> AppResult<Vec<T>> {
        let mut records = Vec::with_capacity(models.len());
        for model in models {
            records.push(self.hydrate(model).await?);
        }
        Ok(records)
    }

    /// Commit on success, roll back on error
    async fn finish<R: Send>(txn: DatabaseTransaction, outcome: AppResult<R>) -> AppResult<R> {
        match outcome {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Write the row and its owned relations
    async fn write(&self, record: &T, txn: &DatabaseTransaction) -> AppResult<T::Model> {
        let active = record.to_active_model();
        let model = match record.key() {
            None => active.insert(txn).await?,
            Some(id) => active.update(txn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => {
                    tracing::debug!(table = T::TABLE, ?id, "Update matched no row");
                    AppError::NotFound
                }
                other => AppError::from(other),
            })?,
        };

        record.store_relations(T::key_of(&model), txn).await?;
        Ok(model)
    }

    async fn write_all(&self, records: &[T], txn: &DatabaseTransaction) -> AppResult<Vec<T::Model>> {
        let mut models = Vec::with_capacity(records.len());
        for record in records {
            models.push(self.write(record, txn).await?);
        }
        Ok(models)
    }

    /// Delete one row and its owned relations; returns the affected row count
    async fn remove(&self, id: T::Key) -> AppResult<u64> {
        let txn = self.db.begin().await?;
        let outcome = Self::remove_in(id, &txn).await;
        Self::finish(txn, outcome).await
    }

    async fn remove_in(id: T::Key, txn: &DatabaseTransaction) -> AppResult<u64> {
        T::remove_relations(id, txn).await?;
        let result = T::Entity::delete_by_id(id).exec(txn).await?;
        Ok(result.rows_affected)
    }

    async fn remove_all_in(txn: &DatabaseTransaction) -> AppResult<u64> {
        T::remove_all_relations(txn).await?;
        let result = T::Entity::delete_many().exec(txn).await?;
        Ok(result.rows_affected)
    }
}

impl<T> Clone for SeaRepository<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T: EntityMapping> Repository<T, T::Key> for SeaRepository<T> {
    async fn save(&self, record: T) -> AppResult<T> {
        let txn = self.db.begin().await?;
        let outcome = self.write(&record, &txn).await;
        let model = Self::finish(txn, outcome).await?;

        tracing::debug!(table = T::TABLE, id = ?T::key_of(&model), "Record saved");
        self.hydrate(model).await
    }

    async fn save_all(&self, records: Vec<T>) -> AppResult<Vec<T>> {
        let txn = self.db.begin().await?;
        let outcome = self.write_all(&records, &txn).await;
        let models = Self::finish(txn, outcome).await?;

        tracing::debug!(table = T::TABLE, count = models.len(), "Records saved");
        self.hydrate_all(models).await
    }

    async fn find_by_id(&self, id: T::Key) -> AppResult<Option<T>> {
        match T::Entity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_id(&self, id: T::Key) -> AppResult<bool> {
        let found = T::Entity::find_by_id(id).count(&self.db).await?;
        Ok(found > 0)
    }

    async fn find_all(&self) -> AppResult<Vec<T>> {
        let models = T::Entity::find()
            .order_by_asc(T::key_column())
            .all(&self.db)
            .await?;
        self.hydrate_all(models).await
    }

    async fn find_all_by_id(&self, ids: Vec<T::Key>) -> AppResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = T::Entity::find()
            .filter(T::key_column().is_in(ids))
            .order_by_asc(T::key_column())
            .all(&self.db)
            .await?;
        self.hydrate_all(models).await
    }

    async fn count(&self) -> AppResult<u64> {
        T::Entity::find()
            .paginate(&self.db, 1)
            .num_items()
            .await
            .map_err(Into::into)
    }

    async fn delete_by_id(&self, id: T::Key) -> AppResult<()> {
        if self.remove(id).await? == 0 {
            return Err(AppError::NotFound);
        }

        tracing::debug!(table = T::TABLE, ?id, "Record deleted");
        Ok(())
    }

    async fn delete(&self, record: &T) -> AppResult<()> {
        let Some(id) = record.key() else {
            tracing::debug!(table = T::TABLE, "Skipping delete of unsaved record");
            return Ok(());
        };

        if self.remove(id).await? == 0 {
            tracing::debug!(table = T::TABLE, ?id, "Record already gone");
        }
        Ok(())
    }

    async fn delete_all(&self) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let outcome = Self::remove_all_in(&txn).await;
        let rows = Self::finish(txn, outcome).await?;

        tracing::debug!(table = T::TABLE, rows, "Table emptied");
        Ok(())
    }
}
