use std::fmt::Debug;

use model::WithId;
use serde::Serialize;
use utility::id::{HasId, Id};

pub mod seat;
pub mod train;

pub trait DatabaseRow {
    type Model;

    fn to_model(self) -> Self::Model;
}

/// A row that carries the id of the model it maps to.
pub trait IdentifiedRow: DatabaseRow
where
    Self::Model: HasId,
{
    fn get_id(&self) -> Id<Self::Model>;
}

pub fn to_models<R: DatabaseRow>(rows: Vec<R>) -> Vec<R::Model> {
    rows.into_iter().map(|row| row.to_model()).collect::<Vec<_>>()
}

pub fn with_ids<R: IdentifiedRow>(rows: Vec<R>) -> Vec<WithId<R::Model>>
where
    R::Model: HasId,
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    rows.into_iter().map(|row| with_id(row)).collect::<Vec<_>>()
}

pub fn with_id<R: IdentifiedRow>(row: R) -> WithId<R::Model>
where
    R::Model: HasId,
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    WithId::new(row.get_id(), row.to_model())
}
