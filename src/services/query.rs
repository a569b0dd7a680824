//! Small query helpers shared by the list endpoints.

use crate::models::{LIKE_ESCAPE, like_pattern};
use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr, SimpleExpr};

/// Case-insensitive `LIKE %term%` on one column.
pub fn ilike<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col)))
        .like(LikeExpr::new(like_pattern(term)).escape(LIKE_ESCAPE))
}

/// Case-insensitive match on any of the given columns.
pub fn ilike_any<C: ColumnTrait>(cols: &[C], term: &str) -> Condition {
    cols.iter()
        .fold(Condition::any(), |cond, col| cond.add(ilike(*col, term)))
}
