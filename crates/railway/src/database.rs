use std::{error, fmt, result};

use async_trait::async_trait;
use chrono::NaiveDate;
use model::{
    seat::{Passenger, Seat, SeatAvailability, SeatType},
    train::Train,
    WithId,
};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    DuplicateKey,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::NotFound => f.write_str("row not found"),
            DatabaseError::DuplicateKey => f.write_str("duplicate key"),
            DatabaseError::Other(why) => write!(f, "database error: {}", why),
        }
    }
}

impl error::Error for DatabaseError {}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait TrainRepo {
    async fn get_train(&mut self, id: &Id<Train>) -> Result<WithId<Train>>;

    /// Returns all trains ordered by train number.
    async fn get_all_trains(&mut self) -> Result<Vec<WithId<Train>>>;

    async fn trains_by_route(
        &mut self,
        starting_destination: &str,
        ending_destination: &str,
    ) -> Result<Vec<WithId<Train>>>;

    /// Fails with `DatabaseError::DuplicateKey` if the train number is taken.
    async fn insert_train(&mut self, train: WithId<Train>) -> Result<WithId<Train>>;

    /// Deletes the train and, through the foreign key, all of its seats.
    /// With a `departure_date` only a train departing on that date is deleted.
    /// Fails with `DatabaseError::NotFound` if nothing was deleted.
    async fn delete_train(
        &mut self,
        id: &Id<Train>,
        departure_date: Option<NaiveDate>,
    ) -> Result<()>;
}

#[async_trait]
pub trait SeatRepo {
    /// Inserts unbooked seats for a train.
    ///
    /// ## Warning
    ///
    /// Insert at most `Database::BULK_INSERT_MAX` seats at once.
    async fn insert_seats(&mut self, train_id: &Id<Train>, seats: &[Seat]) -> Result<u64>;

    /// All seats of a train, ascending by seat number.
    async fn get_seats(&mut self, train_id: &Id<Train>) -> Result<Vec<Seat>>;

    async fn get_seat(&mut self, train_id: &Id<Train>, seat_number: u32) -> Result<Seat>;

    /// Books the lowest numbered free seat of `seat_type` in a single
    /// statement. Returns `None` if no seat of that type is free.
    async fn book_first_available(
        &mut self,
        train_id: &Id<Train>,
        seat_type: SeatType,
        passenger: &Passenger,
    ) -> Result<Option<Seat>>;

    /// Frees a booked seat and clears its passenger in a single statement.
    /// Returns `None` if the seat does not exist or is not booked.
    async fn release_booked_seat(
        &mut self,
        train_id: &Id<Train>,
        seat_number: u32,
    ) -> Result<Option<Seat>>;

    /// Available and booked counts per seat type, ordered by seat type.
    async fn seat_availability(&mut self, train_id: &Id<Train>) -> Result<Vec<SeatAvailability>>;
}

pub trait DatabaseOperations: TrainRepo + SeatRepo + Send {}

impl<T> DatabaseOperations for T where T: TrainRepo + SeatRepo + Send {}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a railway database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    /// Maximum number of rows a single bulk insert may carry.
    const BULK_INSERT_MAX: usize;

    /// Starts a transaction. Dropping it without `commit` rolls it back.
    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
