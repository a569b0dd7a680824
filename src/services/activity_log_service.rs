use crate::entities::activity_log_entity as logs;
use crate::error::AppResult;
use crate::models::{ActivityLogQuery, ActivityLogResponse, PaginatedResponse, PaginationParams};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Audit trail of dashboard mutations.
#[derive(Clone)]
pub struct ActivityLogService {
    pool: DatabaseConnection,
}

impl ActivityLogService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Writes one log row. Failures are logged and swallowed so that the
    /// business operation that triggered them still succeeds.
    pub async fn record(
        &self,
        actor: i64,
        action: &str,
        subject_type: &str,
        subject_id: i64,
        description: impl Into<String>,
    ) {
        let description = description.into();
        let res = logs::ActiveModel {
            user_id: Set(Some(actor)),
            action: Set(action.to_string()),
            subject_type: Set(Some(subject_type.to_string())),
            subject_id: Set(Some(subject_id)),
            description: Set(description),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        if let Err(e) = res {
            log::error!(
                "Failed to write activity log {} for {} {}: {}",
                action,
                subject_type,
                subject_id,
                e
            );
        }
    }

    pub async fn list(
        &self,
        query: &ActivityLogQuery,
    ) -> AppResult<PaginatedResponse<ActivityLogResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = logs::Entity::find();
        if let Some(user_id) = query.user_id {
            select = select.filter(logs::Column::UserId.eq(user_id));
        }
        if let Some(action) = query.action.as_deref().filter(|a| !a.is_empty()) {
            select = select.filter(logs::Column::Action.eq(action));
        }
        if let Some(subject) = query.subject_type.as_deref().filter(|s| !s.is_empty()) {
            select = select.filter(logs::Column::SubjectType.eq(subject));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(logs::Column::CreatedAt)
            .order_by_desc(logs::Column::Id)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            params,
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;

    #[tokio::test]
    async fn test_record_and_filter() {
        let pool = setup_db().await;
        let svc = ActivityLogService::new(pool);

        svc.record(1, "category.created", "category", 10, "Created category Music")
            .await;
        svc.record(2, "venue.deleted", "venue", 3, "Moved venue Hall A to trash")
            .await;
        svc.record(1, "venue.created", "venue", 4, "Created venue Hall B")
            .await;

        let all = svc.list(&ActivityLogQuery::default()).await.unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.data[0].action, "venue.created");

        let by_user = svc
            .list(&ActivityLogQuery {
                user_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_user.total, 2);

        let by_subject = svc
            .list(&ActivityLogQuery {
                subject_type: Some("venue".into()),
                action: Some("venue.deleted".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_subject.total, 1);
        assert_eq!(by_subject.data[0].subject_id, Some(3));
    }
}
