use model::{
    seat::{Passenger, Seat, SeatAvailability, SeatType},
    train::Train,
};
use railway::database::Result;
use sqlx::{Executor, Sqlite};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{
    seat::{RowGender, RowSeatType, SeatAvailabilityRow, SeatRow},
    to_models, DatabaseRow,
};

use super::convert_error;

pub async fn insert_all<'c, E>(executor: E, train_id: &Id<Train>, seats: &[Seat]) -> Result<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let train_number = train_id.raw();
    super::insert_all(
        executor,
        "seats",
        &["train_number", "seat_number", "seat_type"],
        seats,
        |query, seat| {
            query
                .bind(train_number.clone())
                .bind(i64::from(seat.seat_number))
                .bind(RowSeatType::from_seat_type(seat.seat_type))
        },
    )
    .await
    .map_err(convert_error)
}

pub async fn get_all<'c, E>(executor: E, train_id: &Id<Train>) -> Result<Vec<Seat>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        SELECT
            seat_number,
            seat_type,
            booked,
            passenger_name,
            passenger_age,
            passenger_gender
        FROM seats
        WHERE train_number = ?
        ORDER BY seat_number ASC;
        ",
    )
    .bind(train_id.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|seats: Vec<SeatRow>| Ok(to_models(seats)))
}

pub async fn get<'c, E>(executor: E, train_id: &Id<Train>, seat_number: u32) -> Result<Seat>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        SELECT
            seat_number,
            seat_type,
            booked,
            passenger_name,
            passenger_age,
            passenger_gender
        FROM seats
        WHERE train_number = ? AND seat_number = ?;
        ",
    )
    .bind(train_id.raw())
    .bind(i64::from(seat_number))
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: SeatRow| row.to_model())
}

/// Picks and books the lowest numbered free seat of `seat_type` in one
/// statement. `None` if every seat of that type is taken.
pub async fn book_first_available<'c, E>(
    executor: E,
    train_id: &Id<Train>,
    seat_type: SeatType,
    passenger: &Passenger,
) -> Result<Option<Seat>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        UPDATE seats
        SET booked = 1,
            passenger_name = ?1,
            passenger_age = ?2,
            passenger_gender = ?3
        WHERE train_number = ?4
            AND booked = 0
            AND seat_number = (
                SELECT MIN(seat_number)
                FROM seats
                WHERE train_number = ?4 AND seat_type = ?5 AND booked = 0
            )
        RETURNING
            seat_number,
            seat_type,
            booked,
            passenger_name,
            passenger_age,
            passenger_gender;
        ",
    )
    .bind(passenger.name.clone())
    .bind(i64::from(passenger.age))
    .bind(RowGender::from_gender(passenger.gender))
    .bind(train_id.raw())
    .bind(RowSeatType::from_seat_type(seat_type))
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(|row: SeatRow| row.to_model())
    .let_owned(Ok)
}

/// `None` if the seat does not exist or is not booked.
pub async fn release_booked<'c, E>(
    executor: E,
    train_id: &Id<Train>,
    seat_number: u32,
) -> Result<Option<Seat>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        UPDATE seats
        SET booked = 0,
            passenger_name = NULL,
            passenger_age = NULL,
            passenger_gender = NULL
        WHERE train_number = ? AND seat_number = ? AND booked = 1
        RETURNING
            seat_number,
            seat_type,
            booked,
            passenger_name,
            passenger_age,
            passenger_gender;
        ",
    )
    .bind(train_id.raw())
    .bind(i64::from(seat_number))
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(|row: SeatRow| row.to_model())
    .let_owned(Ok)
}

pub async fn availability<'c, E>(
    executor: E,
    train_id: &Id<Train>,
) -> Result<Vec<SeatAvailability>>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        SELECT
            seat_type,
            SUM(CASE WHEN booked = 0 THEN 1 ELSE 0 END) AS available,
            SUM(CASE WHEN booked = 1 THEN 1 ELSE 0 END) AS booked
        FROM seats
        WHERE train_number = ?
        GROUP BY seat_type
        ORDER BY seat_type ASC;
        ",
    )
    .bind(train_id.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<SeatAvailabilityRow>| Ok(to_models(rows)))
}
