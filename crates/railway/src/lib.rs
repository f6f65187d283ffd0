use std::{error::Error, fmt};

pub mod client;
pub mod database;

#[derive(Debug)]
pub enum RequestError {
    /// Rejected input, e.g. a train number with characters outside `[A-Za-z0-9_]`.
    InvalidFormat(String),
    DuplicateKey,
    NotFound,
    /// No free seat of the requested type is left.
    NoAvailability,
    /// Cancellation of a seat that is not booked.
    NotBooked,
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat(message.into())
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidFormat(message) => f.write_str(message),
            RequestError::DuplicateKey => f.write_str("The item exists already."),
            RequestError::NotFound => f.write_str("The requested item does not exist."),
            RequestError::NoAvailability => {
                f.write_str("No seat of the requested type is available.")
            }
            RequestError::NotBooked => f.write_str("The seat is not booked."),
            RequestError::Other(why) => write!(f, "{}", why),
        }
    }
}

impl Error for RequestError {}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::DuplicateKey => Self::DuplicateKey,
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;

pub fn not_found_to_none<O>(result: RequestResult<O>) -> RequestResult<Option<O>> {
    if let Err(RequestError::NotFound) = result {
        Ok(None)
    } else {
        result.map(Some)
    }
}
