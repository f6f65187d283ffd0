use async_trait::async_trait;
use model::{
    seat::{Gender, Passenger, Seat, SeatAvailability, SeatStatus, SeatType},
    train::Train,
};
use railway::database::{Result, SeatRepo};
use sqlx::prelude::FromRow;
use utility::id::Id;

use crate::{
    queries::seat::{
        availability, book_first_available, get, get_all, insert_all, release_booked,
    },
    SqliteDatabaseAutocommit, SqliteDatabaseTransaction,
};

use super::DatabaseRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum RowSeatType {
    Window,
    Aisle,
    Middle,
}

impl RowSeatType {
    pub fn to_seat_type(self) -> SeatType {
        match self {
            Self::Window => SeatType::Window,
            Self::Aisle => SeatType::Aisle,
            Self::Middle => SeatType::Middle,
        }
    }

    pub fn from_seat_type(seat_type: SeatType) -> Self {
        match seat_type {
            SeatType::Window => Self::Window,
            SeatType::Aisle => Self::Aisle,
            SeatType::Middle => Self::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum RowGender {
    Male,
    Female,
    Other,
}

impl RowGender {
    pub fn to_gender(self) -> Gender {
        match self {
            Self::Male => Gender::Male,
            Self::Female => Gender::Female,
            Self::Other => Gender::Other,
        }
    }

    pub fn from_gender(gender: Gender) -> Self {
        match gender {
            Gender::Male => Self::Male,
            Gender::Female => Self::Female,
            Gender::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SeatRow {
    pub seat_number: i64,
    pub seat_type: RowSeatType,
    pub booked: bool,
    pub passenger_name: Option<String>,
    pub passenger_age: Option<i64>,
    pub passenger_gender: Option<RowGender>,
}

impl DatabaseRow for SeatRow {
    type Model = Seat;

    fn to_model(self) -> Self::Model {
        let age = self
            .passenger_age
            .and_then(|age| u32::try_from(age).ok());
        // the table constraint guarantees a complete passenger on booked seats
        let status = match (self.booked, self.passenger_name, age, self.passenger_gender) {
            (true, Some(name), Some(age), Some(gender)) => SeatStatus::Booked {
                passenger: Passenger {
                    name,
                    age,
                    gender: gender.to_gender(),
                },
            },
            _ => SeatStatus::Available,
        };
        Seat {
            seat_number: u32::try_from(self.seat_number).unwrap_or_default(),
            seat_type: self.seat_type.to_seat_type(),
            status,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SeatAvailabilityRow {
    pub seat_type: RowSeatType,
    pub available: i64,
    pub booked: i64,
}

impl DatabaseRow for SeatAvailabilityRow {
    type Model = SeatAvailability;

    fn to_model(self) -> Self::Model {
        SeatAvailability {
            seat_type: self.seat_type.to_seat_type(),
            available: u32::try_from(self.available).unwrap_or_default(),
            booked: u32::try_from(self.booked).unwrap_or_default(),
        }
    }
}

// Seat Repo

#[async_trait]
impl SeatRepo for SqliteDatabaseAutocommit {
    async fn insert_seats(&mut self, train_id: &Id<Train>, seats: &[Seat]) -> Result<u64> {
        insert_all(&self.pool, train_id, seats).await
    }

    async fn get_seats(&mut self, train_id: &Id<Train>) -> Result<Vec<Seat>> {
        get_all(&self.pool, train_id).await
    }

    async fn get_seat(&mut self, train_id: &Id<Train>, seat_number: u32) -> Result<Seat> {
        get(&self.pool, train_id, seat_number).await
    }

    async fn book_first_available(
        &mut self,
        train_id: &Id<Train>,
        seat_type: SeatType,
        passenger: &Passenger,
    ) -> Result<Option<Seat>> {
        book_first_available(&self.pool, train_id, seat_type, passenger).await
    }

    async fn release_booked_seat(
        &mut self,
        train_id: &Id<Train>,
        seat_number: u32,
    ) -> Result<Option<Seat>> {
        release_booked(&self.pool, train_id, seat_number).await
    }

    async fn seat_availability(&mut self, train_id: &Id<Train>) -> Result<Vec<SeatAvailability>> {
        availability(&self.pool, train_id).await
    }
}

#[async_trait]
impl<'a> SeatRepo for SqliteDatabaseTransaction<'a> {
    async fn insert_seats(&mut self, train_id: &Id<Train>, seats: &[Seat]) -> Result<u64> {
        insert_all(&mut *self.tx, train_id, seats).await
    }

    async fn get_seats(&mut self, train_id: &Id<Train>) -> Result<Vec<Seat>> {
        get_all(&mut *self.tx, train_id).await
    }

    async fn get_seat(&mut self, train_id: &Id<Train>, seat_number: u32) -> Result<Seat> {
        get(&mut *self.tx, train_id, seat_number).await
    }

    async fn book_first_available(
        &mut self,
        train_id: &Id<Train>,
        seat_type: SeatType,
        passenger: &Passenger,
    ) -> Result<Option<Seat>> {
        book_first_available(&mut *self.tx, train_id, seat_type, passenger).await
    }

    async fn release_booked_seat(
        &mut self,
        train_id: &Id<Train>,
        seat_number: u32,
    ) -> Result<Option<Seat>> {
        release_booked(&mut *self.tx, train_id, seat_number).await
    }

    async fn seat_availability(&mut self, train_id: &Id<Train>) -> Result<Vec<SeatAvailability>> {
        availability(&mut *self.tx, train_id).await
    }
}
