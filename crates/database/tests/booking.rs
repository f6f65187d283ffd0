use std::{env, fs, path::PathBuf};

use chrono::NaiveDate;
use database::{DatabaseConnectionInfo, SqliteDatabase};
use model::{
    seat::{Gender, Passenger, SeatType},
    train::{Train, MAX_SEAT_COUNT},
};
use railway::{client::Client, RequestError};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    SqlitePool,
};
use utility::id::Id;

/// A database file in the temp dir, removed again on drop.
struct DatabaseFile(PathBuf);

impl DatabaseFile {
    fn new(name: &str) -> Self {
        let path = env::temp_dir().join(format!("railway_{}_{}.db", name, std::process::id()));
        let file = Self(path);
        file.remove();
        file
    }

    fn remove(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = fs::remove_file(path);
        }
    }

    async fn client(&self) -> Client<SqliteDatabase> {
        let database = SqliteDatabase::connect(DatabaseConnectionInfo {
            filename: self.0.clone(),
        })
        .await
        .expect("file database");
        Client::new("test", database)
    }

    /// A second pool on the same file, bypassing the client.
    async fn raw_pool(&self) -> SqlitePool {
        SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(&self.0)
                .journal_mode(SqliteJournalMode::Wal),
        )
        .await
        .expect("raw pool")
    }
}

impl Drop for DatabaseFile {
    fn drop(&mut self) {
        self.remove();
    }
}

async fn client() -> Client<SqliteDatabase> {
    let database = SqliteDatabase::in_memory()
        .await
        .expect("in-memory database");
    Client::new("test", database)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn train(name: &str, start: &str, end: &str) -> Train {
    Train {
        name: name.to_owned(),
        departure_date: date(2024, 10, 18),
        starting_destination: start.to_owned(),
        ending_destination: end.to_owned(),
    }
}

fn passenger(name: &str) -> Passenger {
    Passenger {
        name: name.to_owned(),
        age: 29,
        gender: Gender::Other,
    }
}

fn id(number: &str) -> Id<Train> {
    Id::new(number.to_owned())
}

#[tokio::test]
async fn add_and_list_trains() {
    let client = client().await;
    client
        .add_train("RE83", train("Holstein Express", "Kiel Hbf", "Lübeck Hbf"))
        .await
        .unwrap();
    client
        .add_train("IC2024", train("Ostsee", "Kiel Hbf", "Hamburg Hbf"))
        .await
        .unwrap();

    let trains = client.get_trains().await.unwrap();
    let numbers = trains
        .iter()
        .map(|train| train.id.raw())
        .collect::<Vec<_>>();
    assert_eq!(numbers, vec!["IC2024".to_owned(), "RE83".to_owned()]);

    let found = client.search_train("RE83").await.unwrap().unwrap();
    assert_eq!(found.content.name, "Holstein Express");
    assert_eq!(found.content.departure_date, date(2024, 10, 18));
}

#[tokio::test]
async fn fields_are_trimmed_on_add() {
    let client = client().await;
    let added = client
        .add_train(" RE7 ", train("  Regio ", " Kiel Hbf", "Neumünster  "))
        .await
        .unwrap();
    assert_eq!(added.id.raw(), "RE7");
    assert_eq!(added.content.name, "Regio");
    assert_eq!(added.content.starting_destination, "Kiel Hbf");
    assert_eq!(added.content.ending_destination, "Neumünster");
}

#[tokio::test]
async fn duplicate_train_number_is_rejected() {
    let client = client().await;
    client
        .add_train_with_seats("RE83", train("First", "A", "B"), 10)
        .await
        .unwrap();

    let result = client
        .add_train_with_seats("RE83", train("Second", "C", "D"), 10)
        .await;
    assert!(matches!(result, Err(RequestError::DuplicateKey)));

    // the original train and its seats are untouched
    let kept = client.get_train(&id("RE83")).await.unwrap();
    assert_eq!(kept.content.name, "First");
    assert_eq!(client.get_seats(&id("RE83")).await.unwrap().len(), 10);
}

#[tokio::test]
async fn malformed_train_numbers_never_reach_the_database() {
    let client = client().await;
    for number in ["", "RE 83", "RE-83", "x; DROP TABLE trains", "zug\u{e4}"] {
        let result = client.add_train(number, train("Bad", "A", "B")).await;
        assert!(
            matches!(result, Err(RequestError::InvalidFormat(_))),
            "accepted {:?}",
            number
        );
    }
    assert!(client.get_trains().await.unwrap().is_empty());
    assert!(client.search_train("RE 83").await.unwrap().is_none());
}

#[tokio::test]
async fn blank_fields_and_empty_capacity_are_rejected() {
    let client = client().await;
    let result = client.add_train("RE1", train("   ", "A", "B")).await;
    assert!(matches!(result, Err(RequestError::InvalidFormat(_))));

    let result = client
        .add_train_with_seats("RE1", train("Regio", "A", "B"), 0)
        .await;
    assert!(matches!(result, Err(RequestError::InvalidFormat(_))));

    assert!(client.get_trains().await.unwrap().is_empty());
}

#[tokio::test]
async fn default_train_has_fifty_seats() {
    let client = client().await;
    client
        .add_train("RE83", train("Holstein Express", "A", "B"))
        .await
        .unwrap();

    let summary = client.seat_summary(&id("RE83")).await.unwrap();
    assert_eq!(summary.total, 50);
    let types = summary
        .by_type
        .iter()
        .map(|row| (row.seat_type, row.available, row.booked))
        .collect::<Vec<_>>();
    assert_eq!(
        types,
        vec![
            (SeatType::Aisle, 20, 0),
            (SeatType::Middle, 10, 0),
            (SeatType::Window, 20, 0),
        ]
    );
}

#[tokio::test]
async fn ten_seats_are_typed_by_last_digit() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();

    let seats = client.get_seats(&id("S1")).await.unwrap();
    let layout = seats
        .iter()
        .map(|seat| (seat.seat_number, seat.seat_type))
        .collect::<Vec<_>>();
    assert_eq!(
        layout,
        vec![
            (1, SeatType::Middle),
            (2, SeatType::Aisle),
            (3, SeatType::Aisle),
            (4, SeatType::Window),
            (5, SeatType::Window),
            (6, SeatType::Aisle),
            (7, SeatType::Aisle),
            (8, SeatType::Middle),
            (9, SeatType::Window),
            (10, SeatType::Window),
        ]
    );
    assert!(seats.iter().all(|seat| !seat.is_booked()));
}

#[tokio::test]
async fn large_trains_are_seeded_in_chunks() {
    let client = client().await;
    client
        .add_train_with_seats("LONG", train("Long", "A", "B"), 2500)
        .await
        .unwrap();

    let seats = client.get_seats(&id("LONG")).await.unwrap();
    assert_eq!(seats.len(), 2500);
    assert_eq!(seats.last().map(|seat| seat.seat_number), Some(2500));
}

#[tokio::test]
async fn capacity_is_capped() {
    let client = client().await;
    let result = client
        .add_train_with_seats("HUGE", train("Huge", "A", "B"), MAX_SEAT_COUNT + 1)
        .await;
    assert!(matches!(result, Err(RequestError::InvalidFormat(_))));
    let result = client
        .add_train_with_seats("HUGE", train("Huge", "A", "B"), u32::MAX)
        .await;
    assert!(matches!(result, Err(RequestError::InvalidFormat(_))));
    assert!(client.get_trains().await.unwrap().is_empty());

    client
        .add_train_with_seats("FULL", train("Full", "A", "B"), MAX_SEAT_COUNT)
        .await
        .unwrap();
    let summary = client.seat_summary(&id("FULL")).await.unwrap();
    assert_eq!(summary.total, MAX_SEAT_COUNT);
}

#[tokio::test]
async fn failed_seeding_leaves_no_train_behind() {
    let file = DatabaseFile::new("failed_seeding");
    let client = file.client().await;
    let raw = file.raw_pool().await;
    // breaks the second insert chunk
    sqlx::query(
        "
        CREATE TRIGGER fail_seeding BEFORE INSERT ON seats
        WHEN NEW.seat_number = 1200
        BEGIN
            SELECT RAISE(ABORT, 'seeding failed');
        END;
        ",
    )
    .execute(&raw)
    .await
    .unwrap();

    let result = client
        .add_train_with_seats("S1", train("Short", "A", "B"), 1500)
        .await;
    assert!(matches!(result, Err(RequestError::Other(_))));

    assert!(client.search_train("S1").await.unwrap().is_none());
    let seats: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats;")
        .fetch_one(&raw)
        .await
        .unwrap();
    assert_eq!(seats, 0);
    raw.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_get_distinct_seats() {
    let file = DatabaseFile::new("concurrent_bookings");
    let client = file.client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 20)
        .await
        .unwrap();

    let tasks = (0..10)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .book_seat(&id("S1"), SeatType::Window, passenger(&format!("P{}", i)))
                    .await
            })
        })
        .collect::<Vec<_>>();

    let mut booked = vec![];
    let mut sold_out = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(seat) => booked.push(seat.seat_number),
            Err(RequestError::NoAvailability) => sold_out += 1,
            Err(why) => panic!("unexpected booking error: {}", why),
        }
    }
    booked.sort_unstable();
    assert_eq!(booked, vec![4, 5, 9, 10, 14, 15, 19, 20]);
    assert_eq!(sold_out, 2);

    // concurrent cancels free each seat exactly once
    let tasks = [4, 4, 9]
        .into_iter()
        .map(|seat_number| {
            let client = client.clone();
            tokio::spawn(async move { client.cancel_seat(&id("S1"), seat_number).await })
        })
        .collect::<Vec<_>>();
    let mut cancelled = 0;
    let mut not_booked = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => cancelled += 1,
            Err(RequestError::NotBooked) => not_booked += 1,
            Err(why) => panic!("unexpected cancel error: {}", why),
        }
    }
    assert_eq!((cancelled, not_booked), (2, 1));
}

#[tokio::test]
async fn bookings_take_lowest_free_seat_until_exhausted() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();

    let mut booked = vec![];
    for i in 0..4 {
        let seat = client
            .book_seat(&id("S1"), SeatType::Window, passenger(&format!("P{}", i)))
            .await
            .unwrap();
        assert_eq!(seat.seat_type, SeatType::Window);
        booked.push(seat.seat_number);
    }
    assert_eq!(booked, vec![4, 5, 9, 10]);

    let result = client
        .book_seat(&id("S1"), SeatType::Window, passenger("Late"))
        .await;
    assert!(matches!(result, Err(RequestError::NoAvailability)));

    // other types are not affected
    let middle = client
        .book_seat(&id("S1"), SeatType::Middle, passenger("Mia"))
        .await
        .unwrap();
    assert_eq!(middle.seat_number, 1);
}

#[tokio::test]
async fn booked_seat_carries_passenger() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();

    let seat = client
        .book_seat(
            &id("S1"),
            SeatType::Aisle,
            Passenger {
                name: "  Jens Hansen ".to_owned(),
                age: 61,
                gender: Gender::Male,
            },
        )
        .await
        .unwrap();
    assert_eq!(seat.seat_number, 2);
    let stored = client.get_seats(&id("S1")).await.unwrap();
    let passenger = stored[1].passenger().unwrap();
    assert_eq!(passenger.name, "Jens Hansen");
    assert_eq!(passenger.age, 61);
    assert_eq!(passenger.gender, Gender::Male);
    assert!(stored[0].passenger().is_none());

    let summary = client.seat_summary(&id("S1")).await.unwrap();
    let aisle = summary.of(SeatType::Aisle).unwrap();
    assert_eq!((aisle.available, aisle.booked), (3, 1));
    assert_eq!(summary.total, 10);
}

#[tokio::test]
async fn invalid_bookings_are_rejected() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();

    let result = client
        .book_seat(&id("NOPE"), SeatType::Aisle, passenger("Anna"))
        .await;
    assert!(matches!(result, Err(RequestError::NotFound)));

    let result = client
        .book_seat(&id("S1"), SeatType::Aisle, passenger(" "))
        .await;
    assert!(matches!(result, Err(RequestError::InvalidFormat(_))));

    let result = client
        .book_seat(
            &id("S1"),
            SeatType::Aisle,
            Passenger {
                age: 0,
                ..passenger("Baby")
            },
        )
        .await;
    assert!(matches!(result, Err(RequestError::InvalidFormat(_))));

    let summary = client.seat_summary(&id("S1")).await.unwrap();
    assert!(summary.by_type.iter().all(|row| row.booked == 0));
}

#[tokio::test]
async fn cancel_then_rebook_reuses_lowest_seat() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();

    for name in ["A", "B", "C"] {
        client
            .book_seat(&id("S1"), SeatType::Aisle, passenger(name))
            .await
            .unwrap();
    }

    let freed = client.cancel_seat(&id("S1"), 3).await.unwrap();
    assert_eq!(freed.seat_number, 3);
    assert!(!freed.is_booked());
    assert!(freed.passenger().is_none());

    let rebooked = client
        .book_seat(&id("S1"), SeatType::Aisle, passenger("D"))
        .await
        .unwrap();
    assert_eq!(rebooked.seat_number, 3);

    let next = client
        .book_seat(&id("S1"), SeatType::Aisle, passenger("E"))
        .await
        .unwrap();
    assert_eq!(next.seat_number, 7);
}

#[tokio::test]
async fn cancel_is_strict() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();

    let result = client.cancel_seat(&id("S1"), 4).await;
    assert!(matches!(result, Err(RequestError::NotBooked)));

    let result = client.cancel_seat(&id("S1"), 11).await;
    assert!(matches!(result, Err(RequestError::NotFound)));

    let result = client.cancel_seat(&id("S1"), 0).await;
    assert!(matches!(result, Err(RequestError::NotFound)));

    let result = client.cancel_seat(&id("NOPE"), 1).await;
    assert!(matches!(result, Err(RequestError::NotFound)));

    client
        .book_seat(&id("S1"), SeatType::Window, passenger("Ole"))
        .await
        .unwrap();
    client.cancel_seat(&id("S1"), 4).await.unwrap();
    let result = client.cancel_seat(&id("S1"), 4).await;
    assert!(matches!(result, Err(RequestError::NotBooked)));
}

#[tokio::test]
async fn delete_removes_train_and_seats() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();
    client
        .book_seat(&id("S1"), SeatType::Window, passenger("Ole"))
        .await
        .unwrap();

    client.delete_train(&id("S1"), None).await.unwrap();

    assert!(client.search_train("S1").await.unwrap().is_none());
    assert!(matches!(
        client.get_seats(&id("S1")).await,
        Err(RequestError::NotFound)
    ));
    assert!(matches!(
        client.delete_train(&id("S1"), None).await,
        Err(RequestError::NotFound)
    ));

    // a new train with the same number starts with fresh seats
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 5)
        .await
        .unwrap();
    let seats = client.get_seats(&id("S1")).await.unwrap();
    assert_eq!(seats.len(), 5);
    assert!(seats.iter().all(|seat| !seat.is_booked()));
}

#[tokio::test]
async fn delete_checks_departure_date() {
    let client = client().await;
    client
        .add_train_with_seats("S1", train("Short", "A", "B"), 10)
        .await
        .unwrap();

    let result = client.delete_train(&id("S1"), Some(date(2024, 10, 19))).await;
    assert!(matches!(result, Err(RequestError::NotFound)));
    assert!(client.search_train("S1").await.unwrap().is_some());

    client
        .delete_train(&id("S1"), Some(date(2024, 10, 18)))
        .await
        .unwrap();
    assert!(client.search_train("S1").await.unwrap().is_none());
}

#[tokio::test]
async fn search_by_route() {
    let client = client().await;
    client
        .add_train("RE83", train("Holstein Express", "Kiel Hbf", "Lübeck Hbf"))
        .await
        .unwrap();
    client
        .add_train("RE84", train("Holstein Express", "Lübeck Hbf", "Kiel Hbf"))
        .await
        .unwrap();
    client
        .add_train("RB76", train("Regio", "Kiel Hbf", "Lübeck Hbf"))
        .await
        .unwrap();

    let found = client
        .search_trains_by_route(" Kiel Hbf ", "Lübeck Hbf")
        .await
        .unwrap()
        .into_iter()
        .map(|train| train.id.raw())
        .collect::<Vec<_>>();
    assert_eq!(found, vec!["RB76".to_owned(), "RE83".to_owned()]);

    assert!(client
        .search_trains_by_route("Kiel Hbf", "Flensburg")
        .await
        .unwrap()
        .is_empty());

    let result = client.search_trains_by_route("", "Kiel Hbf").await;
    assert!(matches!(result, Err(RequestError::InvalidFormat(_))));
}

#[tokio::test]
async fn seat_operations_on_unknown_train() {
    let client = client().await;
    assert!(matches!(
        client.seat_summary(&id("NOPE")).await,
        Err(RequestError::NotFound)
    ));
    assert!(matches!(
        client.get_seats(&id("NOPE")).await,
        Err(RequestError::NotFound)
    ));
}
