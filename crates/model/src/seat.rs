use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{non_blank, ExampleData};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum SeatType {
    Aisle,
    Middle,
    Window,
}

impl SeatType {
    /// The type of a seat follows from the last digit of its number:
    /// 0, 4, 5, 9 are window seats, 2, 3, 6, 7 aisle seats, 1 and 8 middle seats.
    pub fn from_seat_number(seat_number: u32) -> Self {
        match seat_number % 10 {
            0 | 4 | 5 | 9 => SeatType::Window,
            2 | 3 | 6 | 7 => SeatType::Aisle,
            _ => SeatType::Middle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Aisle => "Aisle",
            SeatType::Middle => "Middle",
            SeatType::Window => "Window",
        }
    }
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
}

impl Passenger {
    /// Trims the name. Returns `None` for a blank name or an age of zero.
    pub fn trimmed(self) -> Option<Self> {
        if self.age == 0 {
            return None;
        }
        Some(Self {
            name: non_blank(self.name)?,
            age: self.age,
            gender: self.gender,
        })
    }
}

impl ExampleData for Passenger {
    fn example_data() -> Self {
        Self {
            name: "Hanna Petersen".to_owned(),
            age: 34,
            gender: Gender::Female,
        }
    }
}

/// A seat is either free or carries exactly one passenger.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SeatStatus {
    Available,
    Booked { passenger: Passenger },
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub seat_number: u32,
    pub seat_type: SeatType,
    #[serde(flatten)]
    pub status: SeatStatus,
}

impl Seat {
    pub fn available(seat_number: u32) -> Self {
        Self {
            seat_number,
            seat_type: SeatType::from_seat_number(seat_number),
            status: SeatStatus::Available,
        }
    }

    pub fn is_booked(&self) -> bool {
        matches!(self.status, SeatStatus::Booked { .. })
    }

    pub fn passenger(&self) -> Option<&Passenger> {
        match &self.status {
            SeatStatus::Booked { passenger } => Some(passenger),
            SeatStatus::Available => None,
        }
    }
}

impl ExampleData for Seat {
    fn example_data() -> Self {
        Self {
            seat_number: 14,
            seat_type: SeatType::Window,
            status: SeatStatus::Booked {
                passenger: Passenger::example_data(),
            },
        }
    }
}

/// All seats of a freshly created train: numbered `1..=total`, none booked.
pub fn seat_plan(total: u32) -> Vec<Seat> {
    (1..=total).map(Seat::available).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeatAvailability {
    pub seat_type: SeatType,
    pub available: u32,
    pub booked: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub total: u32,
    pub by_type: Vec<SeatAvailability>,
}

impl SeatSummary {
    pub fn new(by_type: Vec<SeatAvailability>) -> Self {
        let total = by_type
            .iter()
            .map(|row| row.available + row.booked)
            .sum();
        Self { total, by_type }
    }

    pub fn of(&self, seat_type: SeatType) -> Option<&SeatAvailability> {
        self.by_type.iter().find(|row| row.seat_type == seat_type)
    }
}

impl ExampleData for SeatSummary {
    fn example_data() -> Self {
        Self::new(vec![
            SeatAvailability {
                seat_type: SeatType::Aisle,
                available: 20,
                booked: 0,
            },
            SeatAvailability {
                seat_type: SeatType::Middle,
                available: 9,
                booked: 1,
            },
            SeatAvailability {
                seat_type: SeatType::Window,
                available: 18,
                booked: 2,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(seats: &[Seat], seat_type: SeatType) -> usize {
        seats.iter().filter(|s| s.seat_type == seat_type).count()
    }

    #[test]
    fn seat_type_follows_last_digit() {
        let expected = [
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
            (18, SeatType::Middle),
            (50, SeatType::Window),
        ];
        for (number, kind) in expected {
            assert_eq!(SeatType::from_seat_number(number), kind, "seat {}", number);
        }
    }

    #[test]
    fn ten_seats_split_four_four_two() {
        let seats = seat_plan(10);
        assert_eq!(count(&seats, SeatType::Window), 4);
        assert_eq!(count(&seats, SeatType::Aisle), 4);
        assert_eq!(count(&seats, SeatType::Middle), 2);
    }

    #[test]
    fn seat_plan_counts_add_up() {
        for total in [0, 1, 7, 10, 23, 50, 101] {
            let seats = seat_plan(total);
            let expected_window = (1..=total)
                .filter(|n| matches!(n % 10, 0 | 4 | 5 | 9))
                .count();
            assert_eq!(seats.len(), total as usize);
            assert_eq!(count(&seats, SeatType::Window), expected_window);
            assert_eq!(
                count(&seats, SeatType::Window)
                    + count(&seats, SeatType::Aisle)
                    + count(&seats, SeatType::Middle),
                total as usize
            );
            assert!(seats.iter().all(|s| !s.is_booked()));
        }
    }

    #[test]
    fn seat_plan_is_numbered_from_one() {
        let numbers = seat_plan(5)
            .into_iter()
            .map(|s| s.seat_number)
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn passenger_validation() {
        assert!(Passenger::example_data().trimmed().is_some());
        let unnamed = Passenger {
            name: "  ".to_owned(),
            ..Passenger::example_data()
        };
        assert!(unnamed.trimmed().is_none());
        let unborn = Passenger {
            age: 0,
            ..Passenger::example_data()
        };
        assert!(unborn.trimmed().is_none());
    }

    #[test]
    fn booked_seat_json_carries_passenger() {
        let json = serde_json::to_value(Seat::example_data()).unwrap();
        assert_eq!(json["seatNumber"], 14);
        assert_eq!(json["seatType"], "Window");
        assert_eq!(json["status"], "booked");
        assert_eq!(json["passenger"]["name"], "Hanna Petersen");

        let free = serde_json::to_value(Seat::available(3)).unwrap();
        assert_eq!(free["status"], "available");
        assert!(free.get("passenger").is_none());
    }

    #[test]
    fn summary_total() {
        let summary = SeatSummary::example_data();
        assert_eq!(summary.total, 50);
        assert_eq!(summary.of(SeatType::Window).map(|row| row.booked), Some(2));
    }
}
