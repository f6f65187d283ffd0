use chrono::NaiveDate;
use model::{
    non_blank,
    seat::{seat_plan, Passenger, Seat, SeatSummary, SeatType},
    train::{Train, DEFAULT_SEAT_COUNT, MAX_SEAT_COUNT},
    WithId,
};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    database::{Database, DatabaseTransaction, SeatRepo, TrainRepo},
    not_found_to_none, RequestError, RequestResult,
};

/// Validates a raw train number without touching the database.
pub fn parse_train_id(number: &str) -> RequestResult<Id<Train>> {
    Id::try_new(number.trim().to_owned()).ok_or_else(|| {
        RequestError::invalid_format(
            "Train number must contain only letters, digits, or underscores.",
        )
    })
}

/// Entry point for all train and seat operations. Cheap to clone; every clone
/// shares the database handle it was created with.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database,
{
    id: String,
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    /// `id` names the client in log lines.
    pub fn new<S>(id: S, database: D) -> Self
    where
        S: Into<String>,
    {
        Self {
            id: id.into(),
            database,
        }
    }
}

// - Train registry -

impl<D> Client<D>
where
    D: Database,
{
    pub async fn add_train(
        &self,
        number: &str,
        train: Train,
    ) -> RequestResult<WithId<Train>> {
        self.add_train_with_seats(number, train, DEFAULT_SEAT_COUNT)
            .await
    }

    /// Creates the train and its `total_seats` seats in one transaction.
    pub async fn add_train_with_seats(
        &self,
        number: &str,
        train: Train,
        total_seats: u32,
    ) -> RequestResult<WithId<Train>> {
        let id = parse_train_id(number)?;
        let train = train
            .trimmed()
            .ok_or_else(|| RequestError::invalid_format("All fields are required."))?;
        if total_seats == 0 {
            return Err(RequestError::invalid_format(
                "A train needs at least one seat.",
            ));
        }
        if total_seats > MAX_SEAT_COUNT {
            return Err(RequestError::invalid_format(format!(
                "A train can have at most {} seats.",
                MAX_SEAT_COUNT
            )));
        }

        let mut tx = self.database.transaction().await?;
        let train = match tx.insert_train(WithId::new(id.clone(), train)).await {
            Ok(train) => train,
            Err(why) => {
                log::warn!("[{}] can not add train {}: {}", self.id, id, why);
                return Err(why.into());
            }
        };
        for chunk in seat_plan(total_seats).chunks(D::BULK_INSERT_MAX) {
            tx.insert_seats(&id, chunk).await?;
        }
        tx.commit().await?;

        log::info!(
            "[{}] added train {} ({}) with {} seats",
            self.id,
            id,
            train.content.name,
            total_seats
        );
        Ok(train)
    }

    pub async fn get_trains(&self) -> RequestResult<Vec<WithId<Train>>> {
        Ok(self.database.auto().get_all_trains().await?)
    }

    pub async fn get_train(&self, id: &Id<Train>) -> RequestResult<WithId<Train>> {
        Ok(self.database.auto().get_train(id).await?)
    }

    /// Looks a train up by its number. A malformed number can not match any
    /// stored train, so it yields `None` instead of an error.
    pub async fn search_train(&self, number: &str) -> RequestResult<Option<WithId<Train>>> {
        let Ok(id) = parse_train_id(number) else {
            return Ok(None);
        };
        not_found_to_none(self.get_train(&id).await)
    }

    pub async fn search_trains_by_route(
        &self,
        starting_destination: &str,
        ending_destination: &str,
    ) -> RequestResult<Vec<WithId<Train>>> {
        let (Some(start), Some(end)) = (
            non_blank(starting_destination),
            non_blank(ending_destination),
        ) else {
            return Err(RequestError::invalid_format(
                "Starting and ending destination are required.",
            ));
        };
        Ok(self.database.auto().trains_by_route(&start, &end).await?)
    }

    /// Deletes a train together with all of its seats. If `departure_date` is
    /// given, it has to match the stored departure date.
    pub async fn delete_train(
        &self,
        id: &Id<Train>,
        departure_date: Option<NaiveDate>,
    ) -> RequestResult<()> {
        self.database
            .auto()
            .delete_train(id, departure_date)
            .await
            .map_err(RequestError::from)
            .also(|result| match result {
                Ok(()) => log::info!("[{}] deleted train {}", self.id, id),
                Err(why) => log::warn!("[{}] can not delete train {}: {}", self.id, id, why),
            })
    }
}

// - Seat allocator -

impl<D> Client<D>
where
    D: Database,
{
    /// Books the lowest numbered free seat of `seat_type`. Selection and update
    /// are one statement, so concurrent bookings never take the same seat.
    pub async fn book_seat(
        &self,
        train_id: &Id<Train>,
        seat_type: SeatType,
        passenger: Passenger,
    ) -> RequestResult<Seat> {
        let passenger = passenger.trimmed().ok_or_else(|| {
            RequestError::invalid_format("Passenger name and a positive age are required.")
        })?;

        let mut auto = self.database.auto();
        auto.get_train(train_id).await?;
        let Some(seat) = auto
            .book_first_available(train_id, seat_type, &passenger)
            .await?
        else {
            log::warn!(
                "[{}] no {} seat left on train {}",
                self.id,
                seat_type,
                train_id
            );
            return Err(RequestError::NoAvailability);
        };

        log::info!(
            "[{}] booked seat {} ({}) on train {}",
            self.id,
            seat.seat_number,
            seat.seat_type,
            train_id
        );
        Ok(seat)
    }

    /// Frees a booked seat. Cancelling a seat that is not booked fails with
    /// `RequestError::NotBooked`.
    pub async fn cancel_seat(
        &self,
        train_id: &Id<Train>,
        seat_number: u32,
    ) -> RequestResult<Seat> {
        let mut auto = self.database.auto();
        auto.get_train(train_id).await?;
        let Some(seat) = auto.release_booked_seat(train_id, seat_number).await? else {
            // tells a free seat apart from one that does not exist
            auto.get_seat(train_id, seat_number).await?;
            return Err(RequestError::NotBooked);
        };

        log::info!(
            "[{}] cancelled seat {} on train {}",
            self.id,
            seat_number,
            train_id
        );
        Ok(seat)
    }

    pub async fn get_seats(&self, train_id: &Id<Train>) -> RequestResult<Vec<Seat>> {
        let mut auto = self.database.auto();
        auto.get_train(train_id).await?;
        Ok(auto.get_seats(train_id).await?)
    }

    pub async fn seat_summary(&self, train_id: &Id<Train>) -> RequestResult<SeatSummary> {
        let mut auto = self.database.auto();
        auto.get_train(train_id).await?;
        auto.seat_availability(train_id)
            .await?
            .let_owned(|by_type| Ok(SeatSummary::new(by_type)))
    }
}
