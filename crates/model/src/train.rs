use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{non_blank, ExampleData};

/// Seats a train gets when no other capacity is requested.
pub const DEFAULT_SEAT_COUNT: u32 = 50;

/// Upper bound for the capacity of a single train.
pub const MAX_SEAT_COUNT: u32 = 5_000;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    pub name: String,
    pub departure_date: NaiveDate,
    pub starting_destination: String,
    pub ending_destination: String,
}

impl Train {
    /// Trims all text fields. Returns `None` if one of them is blank.
    pub fn trimmed(self) -> Option<Self> {
        Some(Self {
            name: non_blank(self.name)?,
            departure_date: self.departure_date,
            starting_destination: non_blank(self.starting_destination)?,
            ending_destination: non_blank(self.ending_destination)?,
        })
    }
}

/// Train numbers end up in urls and log lines, so only `[A-Za-z0-9_]+` is allowed.
pub fn is_valid_train_number(number: &str) -> bool {
    !number.is_empty()
        && number
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl HasId for Train {
    type IdType = String;

    fn is_valid_id(raw: &String) -> bool {
        is_valid_train_number(raw)
    }
}

impl ExampleData for Train {
    fn example_data() -> Self {
        Self {
            name: "Holstein Express".to_owned(),
            departure_date: NaiveDate::from_ymd_opt(2024, 10, 18).unwrap_or_default(),
            starting_destination: "Kiel Hbf".to_owned(),
            ending_destination: "Hamburg Hbf".to_owned(),
        }
    }
}
