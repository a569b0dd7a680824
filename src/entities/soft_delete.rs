//! Soft-delete contract shared by every trashable entity.
//!
//! A row is "trashed" while `deleted_at` is non-null. Normal reads go through
//! [`SoftDelete::find_active`]; the recycle bin is the only place that looks at
//! trashed rows. All state changes are single conditional statements so a row
//! cannot be restored twice or force-deleted while active.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
    Select,
};

pub trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
    fn deleted_by_column() -> Self::Column;

    fn find_active() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_null())
    }

    fn find_active_by_id(id: i64) -> Select<Self> {
        Self::find_active().filter(Self::id_column().eq(id))
    }

    fn find_trashed() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_not_null())
    }
}

/// Active -> Trashed. Returns false when no active row has this id.
pub async fn soft_delete<E, C>(db: &C, id: i64, actor: i64) -> Result<bool, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let res = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Utc::now()))
        .col_expr(E::deleted_by_column(), Expr::value(actor))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Trashed -> Active. Clears both markers.
pub async fn restore<E, C>(db: &C, id: i64) -> Result<bool, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let res = E::update_many()
        .col_expr(
            E::deleted_at_column(),
            Expr::value(Option::<DateTime<Utc>>::None),
        )
        .col_expr(E::deleted_by_column(), Expr::value(Option::<i64>::None))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_not_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Trashed -> Gone. Active rows are never touched.
pub async fn force_delete<E, C>(db: &C, id: i64) -> Result<bool, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let res = E::delete_many()
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_not_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Force-deletes every trashed row of the entity.
pub async fn purge_trashed<E, C>(db: &C) -> Result<u64, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let res = E::delete_many()
        .filter(E::deleted_at_column().is_not_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn count_trashed<E, C>(db: &C) -> Result<u64, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    #[derive(Debug, FromQueryResult)]
    struct CountRow {
        count: i64,
    }
    let count = E::find_trashed()
        .select_only()
        .column_as(Expr::val(1).count(), "count")
        .into_model::<CountRow>()
        .one(db)
        .await?
        .map(|r| r.count)
        .unwrap_or(0);
    Ok(count as u64)
}
