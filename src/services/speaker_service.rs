use crate::entities::{SoftDelete, soft_delete, speaker_entity as speakers};
use crate::error::{AppError, AppResult};
use crate::models::{ListQuery, PaginatedResponse, SpeakerRequest, SpeakerResponse};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::{optional_text, require_text, validate_email};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct SpeakerService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

impl SpeakerService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResponse<SpeakerResponse>> {
        let params = query.pagination();
        let mut select = speakers::Entity::find_active();
        if let Some(term) = query.search_term() {
            select = select.filter(ilike_any(
                &[speakers::Column::Name, speakers::Column::Company],
                &term,
            ));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(speakers::Column::Name)
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

    pub async fn get(&self, id: i64) -> AppResult<SpeakerResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: SpeakerRequest) -> AppResult<SpeakerResponse> {
        let name = require_text("name", &req.name, 255)?;
        let email = checked_email(req.email)?;
        let now = Utc::now();
        let speaker = speakers::ActiveModel {
            name: Set(name),
            title: Set(optional_text(req.title)),
            company: Set(optional_text(req.company)),
            bio: Set(optional_text(req.bio)),
            email: Set(email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "speaker.created",
                "speaker",
                speaker.id,
                format!("Created speaker {}", speaker.name),
            )
            .await;
        Ok(speaker.into())
    }

    pub async fn update(
        &self,
        actor: i64,
        id: i64,
        req: SpeakerRequest,
    ) -> AppResult<SpeakerResponse> {
        let existing = self.find(id).await?;
        let name = require_text("name", &req.name, 255)?;
        let email = checked_email(req.email)?;

        let mut am = existing.into_active_model();
        am.name = Set(name);
        am.title = Set(optional_text(req.title));
        am.company = Set(optional_text(req.company));
        am.bio = Set(optional_text(req.bio));
        am.email = Set(email);
        am.updated_at = Set(Utc::now());
        let speaker = am.update(&self.pool).await?;

        self.activity
            .record(
                actor,
                "speaker.updated",
                "speaker",
                id,
                format!("Updated speaker {}", speaker.name),
            )
            .await;
        Ok(speaker.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !soft_delete::soft_delete::<speakers::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Speaker {id} not found")));
        }
        self.activity
            .record(
                actor,
                "speaker.deleted",
                "speaker",
                id,
                format!("Moved speaker {} to the recycle bin", existing.name),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<speakers::Model> {
        speakers::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Speaker {id} not found")))
    }
}

fn checked_email(email: Option<String>) -> AppResult<Option<String>> {
    let email = optional_text(email);
    if let Some(e) = &email {
        validate_email(e)?;
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;

    #[tokio::test]
    async fn test_speaker_email_is_validated() {
        let pool = setup_db().await;
        let svc = SpeakerService::new(pool.clone(), ActivityLogService::new(pool));

        let req = SpeakerRequest {
            name: "Linus".into(),
            title: Some("Maintainer".into()),
            company: None,
            bio: Some("  ".into()),
            email: Some("not-an-email".into()),
        };
        assert!(matches!(
            svc.create(1, req.clone()).await,
            Err(AppError::ValidationError(_))
        ));

        let created = svc
            .create(
                1,
                SpeakerRequest {
                    email: Some("linus@example.org".into()),
                    ..req
                },
            )
            .await
            .unwrap();
        assert_eq!(created.bio, None);
        assert_eq!(created.email.as_deref(), Some("linus@example.org"));
    }
}
