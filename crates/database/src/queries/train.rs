use chrono::NaiveDate;
use model::{train::Train, WithId};
use railway::database::{DatabaseError, Result};
use sqlx::{Executor, Sqlite};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{train::TrainRow, with_id, with_ids};

use super::convert_error;

pub async fn get<'c, E>(executor: E, id: &Id<Train>) -> Result<WithId<Train>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        SELECT
            train_number,
            train_name,
            departure_date,
            starting_destination,
            ending_destination
        FROM trains
        WHERE train_number = ?;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: TrainRow| with_id(row))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Train>>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        SELECT
            train_number,
            train_name,
            departure_date,
            starting_destination,
            ending_destination
        FROM trains
        ORDER BY train_number ASC;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|trains: Vec<TrainRow>| Ok(with_ids(trains)))
}

pub async fn get_by_route<'c, E>(
    executor: E,
    starting_destination: &str,
    ending_destination: &str,
) -> Result<Vec<WithId<Train>>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        SELECT
            train_number,
            train_name,
            departure_date,
            starting_destination,
            ending_destination
        FROM trains
        WHERE starting_destination = ? AND ending_destination = ?
        ORDER BY departure_date ASC, train_number ASC;
        ",
    )
    .bind(starting_destination)
    .bind(ending_destination)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|trains: Vec<TrainRow>| Ok(with_ids(trains)))
}

pub async fn insert<'c, E>(executor: E, train: WithId<Train>) -> Result<WithId<Train>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        INSERT INTO trains(
            train_number,
            train_name,
            departure_date,
            starting_destination,
            ending_destination
        )
        VALUES (?, ?, ?, ?, ?)
        RETURNING
            train_number,
            train_name,
            departure_date,
            starting_destination,
            ending_destination;
        ",
    )
    .bind(train.id.raw())
    .bind(train.content.name)
    .bind(train.content.departure_date)
    .bind(train.content.starting_destination)
    .bind(train.content.ending_destination)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: TrainRow| with_id(row))
}

/// Seats go with the train through `ON DELETE CASCADE`.
pub async fn delete<'c, E>(
    executor: E,
    id: &Id<Train>,
    departure_date: Option<NaiveDate>,
) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = sqlx::query(
        "
        DELETE FROM trains
        WHERE train_number = ?1
            AND (?2 IS NULL OR departure_date = ?2);
        ",
    )
    .bind(id.raw())
    .bind(departure_date)
    .execute(executor)
    .await
    .map_err(convert_error)?;

    if result.rows_affected() == 0 {
        Err(DatabaseError::NotFound)
    } else {
        Ok(())
    }
}
