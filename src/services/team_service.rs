use crate::entities::{
    SoftDelete, soft_delete, team_entity as teams, team_member_entity as members,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AddTeamMemberRequest, ListQuery, PaginatedResponse, TeamMemberResponse, TeamRequest,
    TeamResponse,
};
use crate::services::ActivityLogService;
use crate::services::query::ilike;
use crate::utils::{optional_text, require_text};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct TeamService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

impl TeamService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResponse<TeamResponse>> {
        let params = query.pagination();
        let mut select = teams::Entity::find_active();
        if let Some(term) = query.search_term() {
            select = select.filter(ilike(teams::Column::Name, &term));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_asc(teams::Column::Name)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for team in rows {
            let count = self.member_count(team.id).await?;
            items.push(TeamResponse::new(team, count));
        }
        Ok(PaginatedResponse::new(items, params, total))
    }

    pub async fn get(&self, id: i64) -> AppResult<TeamResponse> {
        let team = self.find(id).await?;
        let count = self.member_count(id).await?;
        Ok(TeamResponse::new(team, count))
    }

    pub async fn create(&self, actor: i64, req: TeamRequest) -> AppResult<TeamResponse> {
        let name = require_text("name", &req.name, 255)?;
        let now = Utc::now();
        let team = teams::ActiveModel {
            name: Set(name),
            description: Set(optional_text(req.description)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(actor, "team.created", "team", team.id, format!("Created team {}", team.name))
            .await;
        Ok(TeamResponse::new(team, 0))
    }

    pub async fn update(&self, actor: i64, id: i64, req: TeamRequest) -> AppResult<TeamResponse> {
        let existing = self.find(id).await?;
        let name = require_text("name", &req.name, 255)?;

        let mut am = existing.into_active_model();
        am.name = Set(name);
        am.description = Set(optional_text(req.description));
        am.updated_at = Set(Utc::now());
        let team = am.update(&self.pool).await?;

        self.activity
            .record(actor, "team.updated", "team", id, format!("Updated team {}", team.name))
            .await;
        let count = self.member_count(id).await?;
        Ok(TeamResponse::new(team, count))
    }

    /// Refused while the team still has members.
    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        let count = self.member_count(id).await?;
        if count > 0 {
            return Err(AppError::BusinessRule(format!(
                "Team {} still has {} members",
                existing.name, count
            )));
        }

        if !soft_delete::soft_delete::<teams::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Team {id} not found")));
        }
        self.activity
            .record(
                actor,
                "team.deleted",
                "team",
                id,
                format!("Moved team {} to the recycle bin", existing.name),
            )
            .await;
        Ok(())
    }

    pub async fn list_members(&self, team_id: i64) -> AppResult<Vec<TeamMemberResponse>> {
        self.find(team_id).await?;
        let rows = members::Entity::find()
            .filter(members::Column::TeamId.eq(team_id))
            .order_by_asc(members::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn add_member(
        &self,
        actor: i64,
        team_id: i64,
        req: AddTeamMemberRequest,
    ) -> AppResult<TeamMemberResponse> {
        let team = self.find(team_id).await?;
        let user = users::Entity::find_by_id(req.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

        let exists = members::Entity::find()
            .filter(members::Column::TeamId.eq(team_id))
            .filter(members::Column::UserId.eq(user.id))
            .count(&self.pool)
            .await?;
        if exists > 0 {
            return Err(AppError::BusinessRule(format!(
                "{} is already a member of {}",
                user.name, team.name
            )));
        }

        let role = optional_text(req.role).unwrap_or_else(|| "member".to_string());
        let member = members::ActiveModel {
            team_id: Set(team_id),
            user_id: Set(user.id),
            role: Set(role),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "team.member_added",
                "team",
                team_id,
                format!("Added {} to team {}", user.name, team.name),
            )
            .await;
        Ok(member.into())
    }

    pub async fn remove_member(&self, actor: i64, team_id: i64, user_id: i64) -> AppResult<()> {
        let team = self.find(team_id).await?;
        let member = members::Entity::find()
            .filter(members::Column::TeamId.eq(team_id))
            .filter(members::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} is not in this team")))?;
        member.delete(&self.pool).await?;

        self.activity
            .record(
                actor,
                "team.member_removed",
                "team",
                team_id,
                format!("Removed user {} from team {}", user_id, team.name),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<teams::Model> {
        teams::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {id} not found")))
    }

    async fn member_count(&self, team_id: i64) -> AppResult<u64> {
        Ok(members::Entity::find()
            .filter(members::Column::TeamId.eq(team_id))
            .count(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_user, setup_db};

    #[tokio::test]
    async fn test_team_with_members_cannot_be_deleted() {
        let pool = setup_db().await;
        let user_id = seed_user(&pool, "Grace", "grace@eventhub.io").await;
        let svc = TeamService::new(pool.clone(), ActivityLogService::new(pool));

        let team = svc
            .create(
                user_id,
                TeamRequest {
                    name: "Stage crew".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        svc.add_member(
            user_id,
            team.id,
            AddTeamMemberRequest {
                user_id,
                role: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(svc.get(team.id).await.unwrap().member_count, 1);
        assert!(matches!(
            svc.delete(user_id, team.id).await,
            Err(AppError::BusinessRule(_))
        ));

        // duplicate membership
        assert!(matches!(
            svc.add_member(user_id, team.id, AddTeamMemberRequest { user_id, role: None })
                .await,
            Err(AppError::BusinessRule(_))
        ));

        svc.remove_member(user_id, team.id, user_id).await.unwrap();
        svc.delete(user_id, team.id).await.unwrap();
        assert!(matches!(svc.get(team.id).await, Err(AppError::NotFound(_))));
    }
}
