use async_trait::async_trait;
use chrono::NaiveDate;
use model::{train::Train, WithId};
use railway::database::{Result, TrainRepo};
use sqlx::prelude::FromRow;
use utility::id::Id;

use crate::{
    queries::train::{delete, get, get_all, get_by_route, insert},
    SqliteDatabaseAutocommit, SqliteDatabaseTransaction,
};

use super::{DatabaseRow, IdentifiedRow};

#[derive(Debug, Clone, FromRow)]
pub struct TrainRow {
    pub train_number: String,
    pub train_name: String,
    pub departure_date: NaiveDate,
    pub starting_destination: String,
    pub ending_destination: String,
}

impl DatabaseRow for TrainRow {
    type Model = Train;

    fn to_model(self) -> Self::Model {
        Train {
            name: self.train_name,
            departure_date: self.departure_date,
            starting_destination: self.starting_destination,
            ending_destination: self.ending_destination,
        }
    }
}

impl IdentifiedRow for TrainRow {
    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.train_number.clone())
    }
}

// Train Repo

#[async_trait]
impl TrainRepo for SqliteDatabaseAutocommit {
    async fn get_train(&mut self, id: &Id<Train>) -> Result<WithId<Train>> {
        get(&self.pool, id).await
    }

    async fn get_all_trains(&mut self) -> Result<Vec<WithId<Train>>> {
        get_all(&self.pool).await
    }

    async fn trains_by_route(
        &mut self,
        starting_destination: &str,
        ending_destination: &str,
    ) -> Result<Vec<WithId<Train>>> {
        get_by_route(&self.pool, starting_destination, ending_destination).await
    }

    async fn insert_train(&mut self, train: WithId<Train>) -> Result<WithId<Train>> {
        insert(&self.pool, train).await
    }

    async fn delete_train(
        &mut self,
        id: &Id<Train>,
        departure_date: Option<NaiveDate>,
    ) -> Result<()> {
        delete(&self.pool, id, departure_date).await
    }
}

#[async_trait]
impl<'a> TrainRepo for SqliteDatabaseTransaction<'a> {
    async fn get_train(&mut self, id: &Id<Train>) -> Result<WithId<Train>> {
        get(&mut *self.tx, id).await
    }

    async fn get_all_trains(&mut self) -> Result<Vec<WithId<Train>>> {
        get_all(&mut *self.tx).await
    }

    async fn trains_by_route(
        &mut self,
        starting_destination: &str,
        ending_destination: &str,
    ) -> Result<Vec<WithId<Train>>> {
        get_by_route(&mut *self.tx, starting_destination, ending_destination).await
    }

    async fn insert_train(&mut self, train: WithId<Train>) -> Result<WithId<Train>> {
        insert(&mut *self.tx, train).await
    }

    async fn delete_train(
        &mut self,
        id: &Id<Train>,
        departure_date: Option<NaiveDate>,
    ) -> Result<()> {
        delete(&mut *self.tx, id, departure_date).await
    }
}
