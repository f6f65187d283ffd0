use std::fmt::Write as _;

use railway::database::DatabaseError;
use sqlx::{query::Query, sqlite::SqliteArguments, Executor, Sqlite};

pub mod seat;
pub mod train;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            DatabaseError::DuplicateKey
        }
        _ => DatabaseError::Other(Box::new(why)),
    }
}

// bulk insert

/// Inserts all `values` with a single multi-row `INSERT` and returns the
/// number of inserted rows. `bind` has to bind exactly one value per column.
pub async fn insert_all<'c, E, T, B>(
    executor: E,
    table: &str,
    columns: &[&str],
    values: &[T],
    bind: B,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
    for<'a> B: Fn(
        Query<'a, Sqlite, SqliteArguments<'a>>,
        &T,
    ) -> Query<'a, Sqlite, SqliteArguments<'a>>,
{
    if values.is_empty() {
        return Ok(0);
    }

    // build query string
    let mut query_str =
        format!("INSERT INTO {} ({}) VALUES ", table, columns.join(", "));
    let placeholders = vec!["?"; columns.len()].join(", ");
    for i in 0..values.len() {
        if i > 0 {
            query_str.push_str(", ");
        }
        let _ = write!(&mut query_str, "({})", placeholders);
    }
    query_str.push(';');

    // query
    let mut query = sqlx::query::<Sqlite>(&query_str);
    for value in values {
        query = bind(query, value);
    }
    query
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
}
