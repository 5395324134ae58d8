//! SQLite-backed store (through sea-orm).
//!
//! Entries live in the `ledger_entries` table created by the `migration`
//! crate. A batch runs inside one DB transaction.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, TransactionTrait};

use crate::ResultLedger;

use super::{KeyValueStore, StoreOp};

mod entries {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "ledger_entries")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub name: String,
        pub value: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    database: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an already migrated connection.
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

impl KeyValueStore for SqliteStore {
    async fn get_item(&self, key: &str) -> ResultLedger<Option<String>> {
        let model = entries::Entity::find_by_id(key.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(|model| model.value))
    }

    async fn write_batch(&self, ops: Vec<StoreOp>) -> ResultLedger<()> {
        let db_tx = self.database.begin().await?;
        for op in ops {
            match op {
                StoreOp::Set { key, value } => {
                    let existing = entries::Entity::find_by_id(key.clone())
                        .one(&db_tx)
                        .await?;
                    let model = entries::ActiveModel {
                        name: ActiveValue::Set(key),
                        value: ActiveValue::Set(value),
                    };
                    if existing.is_some() {
                        model.update(&db_tx).await?;
                    } else {
                        model.insert(&db_tx).await?;
                    }
                }
                StoreOp::Remove { key } => {
                    entries::Entity::delete_by_id(key).exec(&db_tx).await?;
                }
            }
        }
        db_tx.commit().await?;
        Ok(())
    }
}
