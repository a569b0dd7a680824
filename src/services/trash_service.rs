use crate::entities::{
    SoftDelete, category_entity as categories, event_entity as events, page_entity as pages,
    review_entity as reviews, soft_delete, speaker_entity as speakers, sponsor_entity as sponsors,
    survey_entity as surveys, team_entity as teams, vendor_entity as vendors,
    venue_entity as venues,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    BulkTrashResult, PaginatedResponse, PaginationParams, TrashCount, TrashCountsResponse,
    TrashItemRef, TrashKind, TrashQuery, TrashedItem, like_pattern, search_term,
};
use crate::services::ActivityLogService;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, Statement, Value,
};

/// Runs a generic soft-delete function against the entity behind a kind.
macro_rules! for_kind {
    ($kind:expr, $func:ident($($arg:expr),*)) => {
        match $kind {
            TrashKind::Category => soft_delete::$func::<categories::Entity, _>($($arg),*).await,
            TrashKind::Team => soft_delete::$func::<teams::Entity, _>($($arg),*).await,
            TrashKind::Event => soft_delete::$func::<events::Entity, _>($($arg),*).await,
            TrashKind::Venue => soft_delete::$func::<venues::Entity, _>($($arg),*).await,
            TrashKind::Sponsor => soft_delete::$func::<sponsors::Entity, _>($($arg),*).await,
            TrashKind::Speaker => soft_delete::$func::<speakers::Entity, _>($($arg),*).await,
            TrashKind::Vendor => soft_delete::$func::<vendors::Entity, _>($($arg),*).await,
            TrashKind::Page => soft_delete::$func::<pages::Entity, _>($($arg),*).await,
            TrashKind::Survey => soft_delete::$func::<surveys::Entity, _>($($arg),*).await,
            TrashKind::Review => soft_delete::$func::<reviews::Entity, _>($($arg),*).await,
        }
    };
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: i64,
}

/// Recycle bin over every trashable kind.
#[derive(Clone)]
pub struct TrashService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

impl TrashService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    /// Trashed rows of one kind or all kinds, newest deletion first.
    pub async fn list(&self, query: &TrashQuery) -> AppResult<PaginatedResponse<TrashedItem>> {
        let kinds = match TrashKind::parse_filter(query.kind.as_deref())? {
            Some(kind) => vec![kind],
            None => TrashKind::ALL.to_vec(),
        };
        let params = PaginationParams::new(query.page, query.per_page);
        let search = search_term(query.search.as_deref());
        let (union_sql, values) = union_query(&kinds, search.as_deref());
        let backend = self.pool.get_database_backend();

        let count_sql = format!("SELECT COUNT(*) AS total FROM ({union_sql}) trashed");
        let total = TotalRow::find_by_statement(Statement::from_sql_and_values(
            backend,
            count_sql,
            values.clone(),
        ))
        .one(&self.pool)
        .await?
        .map(|r| r.total)
        .unwrap_or(0);

        let page_sql = format!(
            "SELECT * FROM ({union_sql}) trashed ORDER BY deleted_at DESC, kind ASC, id DESC LIMIT {} OFFSET {}",
            params.get_limit(),
            params.get_offset()
        );
        let items = TrashedItem::find_by_statement(Statement::from_sql_and_values(
            backend, page_sql, values,
        ))
        .all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(items, params, total.max(0) as u64))
    }

    pub async fn counts(&self) -> AppResult<TrashCountsResponse> {
        let mut counts = Vec::with_capacity(TrashKind::ALL.len());
        for kind in TrashKind::ALL {
            let count = for_kind!(kind, count_trashed(&self.pool))?;
            counts.push(TrashCount { kind, count });
        }
        let total = counts.iter().map(|c| c.count).sum();
        Ok(TrashCountsResponse { counts, total })
    }

    /// Trashed -> active. NotFound for unknown kinds or when no trashed row matches.
    pub async fn restore(&self, actor: i64, kind: &str, id: i64) -> AppResult<()> {
        let kind: TrashKind = kind.parse()?;
        if let Some(parent_id) = self.trashed_parent(kind, id).await? {
            return Err(AppError::BusinessRule(format!(
                "Restore the parent category #{parent_id} first"
            )));
        }
        if !self.restore_one(kind, id).await? {
            return Err(not_in_trash(kind, id));
        }
        self.activity
            .record(
                actor,
                &format!("{kind}.restored"),
                kind.as_str(),
                id,
                format!("Restored {kind} #{id} from the recycle bin"),
            )
            .await;
        Ok(())
    }

    /// Trashed -> gone. Active rows are never removed here.
    pub async fn force_delete(&self, actor: i64, kind: &str, id: i64) -> AppResult<()> {
        let kind: TrashKind = kind.parse()?;
        if !self.force_delete_one(kind, id).await? {
            return Err(not_in_trash(kind, id));
        }
        self.activity
            .record(
                actor,
                &format!("{kind}.force_deleted"),
                kind.as_str(),
                id,
                format!("Permanently deleted {kind} #{id}"),
            )
            .await;
        Ok(())
    }

    /// Children whose parent is restored later in the same request are retried,
    /// so the order of `items` does not matter.
    pub async fn bulk_restore(&self, actor: i64, items: &[TrashItemRef]) -> AppResult<BulkTrashResult> {
        let mut processed = 0;
        let mut skipped = Vec::new();
        let mut pending = Vec::with_capacity(items.len());
        for item in items {
            match item.kind.parse::<TrashKind>() {
                Ok(kind) => pending.push((kind, item)),
                Err(_) => skipped.push(item.clone()),
            }
        }

        while !pending.is_empty() {
            let mut blocked = Vec::new();
            let before = processed;
            for (kind, item) in pending {
                if self.trashed_parent(kind, item.id).await?.is_some() {
                    blocked.push((kind, item));
                } else if self.restore_one(kind, item.id).await? {
                    processed += 1;
                    self.activity
                        .record(
                            actor,
                            &format!("{kind}.restored"),
                            kind.as_str(),
                            item.id,
                            format!("Restored {kind} #{} from the recycle bin", item.id),
                        )
                        .await;
                } else {
                    skipped.push(item.clone());
                }
            }
            if processed == before {
                skipped.extend(blocked.into_iter().map(|(_, item)| item.clone()));
                break;
            }
            pending = blocked;
        }

        if !skipped.is_empty() {
            log::warn!("Bulk restore skipped {} unresolved items", skipped.len());
        }
        Ok(BulkTrashResult { processed, skipped })
    }

    pub async fn bulk_force_delete(
        &self,
        actor: i64,
        items: &[TrashItemRef],
    ) -> AppResult<BulkTrashResult> {
        let mut processed = 0;
        let mut skipped = Vec::new();
        for item in items {
            let Ok(kind) = item.kind.parse::<TrashKind>() else {
                skipped.push(item.clone());
                continue;
            };
            if self.force_delete_one(kind, item.id).await? {
                processed += 1;
                self.activity
                    .record(
                        actor,
                        &format!("{kind}.force_deleted"),
                        kind.as_str(),
                        item.id,
                        format!("Permanently deleted {kind} #{}", item.id),
                    )
                    .await;
            } else {
                skipped.push(item.clone());
            }
        }
        if !skipped.is_empty() {
            log::warn!("Bulk delete skipped {} unresolved items", skipped.len());
        }
        Ok(BulkTrashResult { processed, skipped })
    }

    /// Permanently removes every trashed row of one kind, or of all kinds.
    pub async fn empty(&self, actor: i64, kind: Option<&str>) -> AppResult<u64> {
        let kinds = match TrashKind::parse_filter(kind)? {
            Some(kind) => vec![kind],
            None => TrashKind::ALL.to_vec(),
        };

        let mut deleted = 0;
        for kind in kinds {
            let n = for_kind!(kind, purge_trashed(&self.pool))?;
            if n > 0 {
                deleted += n;
                self.activity
                    .record(
                        actor,
                        &format!("{kind}.trash_emptied"),
                        kind.as_str(),
                        0,
                        format!("Emptied {n} {kind} records from the recycle bin"),
                    )
                    .await;
            }
        }
        log::info!("Recycle bin emptied: {} rows removed", deleted);
        Ok(deleted)
    }

    /// Id of the trashed parent that keeps a trashed category in the bin.
    async fn trashed_parent(&self, kind: TrashKind, id: i64) -> Result<Option<i64>, DbErr> {
        if kind != TrashKind::Category {
            return Ok(None);
        }
        let Some(parent_id) = categories::Entity::find_trashed()
            .filter(categories::Column::Id.eq(id))
            .one(&self.pool)
            .await?
            .and_then(|c| c.parent_id)
        else {
            return Ok(None);
        };
        let parent = categories::Entity::find_trashed()
            .filter(categories::Column::Id.eq(parent_id))
            .one(&self.pool)
            .await?;
        Ok(parent.map(|p| p.id))
    }

    async fn restore_one(&self, kind: TrashKind, id: i64) -> Result<bool, DbErr> {
        for_kind!(kind, restore(&self.pool, id))
    }

    async fn force_delete_one(&self, kind: TrashKind, id: i64) -> Result<bool, DbErr> {
        for_kind!(kind, force_delete(&self.pool, id))
    }
}

fn not_in_trash(kind: TrashKind, id: i64) -> AppError {
    AppError::NotFound(format!("No trashed {kind} with id {id}"))
}

/// `UNION ALL` of one select per kind. Each select gets its own numbered
/// placeholder for the search pattern.
fn union_query(kinds: &[TrashKind], search: Option<&str>) -> (String, Vec<Value>) {
    let mut values = Vec::new();
    let parts: Vec<String> = kinds
        .iter()
        .map(|kind| {
            let label = kind.label_column();
            let mut sql = format!(
                "SELECT '{kind}' AS kind, t.id AS id, t.{label} AS label, \
                 t.deleted_at AS deleted_at, t.deleted_by AS deleted_by, \
                 u.name AS deleted_by_name \
                 FROM {table} t LEFT JOIN users u ON u.id = t.deleted_by \
                 WHERE t.deleted_at IS NOT NULL",
                kind = kind.as_str(),
                table = kind.table(),
            );
            if let Some(term) = search {
                values.push(Value::from(like_pattern(term)));
                sql.push_str(&format!(
                    " AND LOWER(t.{label}) LIKE ${} ESCAPE '\\'",
                    values.len()
                ));
            }
            sql
        })
        .collect();
    (parts.join(" UNION ALL "), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_user, setup_db};
    use crate::models::{CategoryRequest, ListQuery, PageRequest, SurveyRequest, VenueRequest};
    use crate::services::{CategoryService, PageService, SurveyService, VenueService};

    struct Fixture {
        pool: DatabaseConnection,
        trash: TrashService,
        categories: CategoryService,
        venues: VenueService,
        pages: PageService,
        admin: i64,
    }

    async fn fixture() -> Fixture {
        let pool = setup_db().await;
        let admin = seed_user(&pool, "Root Admin", "root@eventhub.io").await;
        let activity = ActivityLogService::new(pool.clone());
        Fixture {
            trash: TrashService::new(pool.clone(), activity.clone()),
            categories: CategoryService::new(pool.clone(), activity.clone()),
            venues: VenueService::new(pool.clone(), activity.clone()),
            pages: PageService::new(pool.clone(), activity),
            pool,
            admin,
        }
    }

    fn category(name: &str) -> CategoryRequest {
        CategoryRequest {
            name: name.into(),
            slug: None,
            description: None,
            parent_id: None,
        }
    }

    fn venue(name: &str) -> VenueRequest {
        VenueRequest {
            name: name.into(),
            address: "10 Main St".into(),
            city: "Austin".into(),
            capacity: Some(100),
        }
    }

    #[test]
    fn test_union_query_numbers_placeholders() {
        let (sql, values) = union_query(&[TrashKind::Event, TrashKind::Venue], Some("Gala"));
        assert_eq!(values.len(), 2);
        assert!(sql.contains("LOWER(t.title) LIKE $1"));
        assert!(sql.contains("LOWER(t.name) LIKE $2"));
        assert_eq!(sql.matches("UNION ALL").count(), 1);

        let (_, values) = union_query(&TrashKind::ALL, None);
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn test_restore_category_clears_markers_and_relists() {
        let f = fixture().await;
        let c = f.categories.create(f.admin, category("Music")).await.unwrap();
        f.categories.delete(f.admin, c.id).await.unwrap();

        let trashed = categories::Entity::find_by_id(c.id)
            .one(&f.pool)
            .await
            .unwrap()
            .unwrap();
        assert!(trashed.deleted_at.is_some());
        assert_eq!(trashed.deleted_by, Some(f.admin));
        assert_eq!(f.categories.list(&ListQuery::default()).await.unwrap().total, 0);

        f.trash.restore(f.admin, "category", c.id).await.unwrap();

        let restored = categories::Entity::find_by_id(c.id)
            .one(&f.pool)
            .await
            .unwrap()
            .unwrap();
        assert!(restored.deleted_at.is_none());
        assert!(restored.deleted_by.is_none());
        let listed = f.categories.list(&ListQuery::default()).await.unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.data[0].id, c.id);

        // already active
        assert!(matches!(
            f.trash.restore(f.admin, "category", c.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_force_deleted_venue_cannot_be_restored() {
        let f = fixture().await;
        let v = f.venues.create(f.admin, venue("Old Barn")).await.unwrap();

        // active rows are out of reach
        assert!(matches!(
            f.trash.force_delete(f.admin, "venue", v.id).await,
            Err(AppError::NotFound(_))
        ));

        f.venues.delete(f.admin, v.id).await.unwrap();
        f.trash.force_delete(f.admin, "venue", v.id).await.unwrap();

        assert!(
            venues::Entity::find_by_id(v.id)
                .one(&f.pool)
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            f.trash.restore(f.admin, "venue", v.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_type_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.trash.restore(f.admin, "ticket_type", 1).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.trash
                .list(&TrashQuery {
                    kind: Some("orders".into()),
                    ..Default::default()
                })
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_search_and_pagination() {
        let f = fixture().await;
        for name in ["Jazz", "Jazz Fusion", "Opera"] {
            let c = f.categories.create(f.admin, category(name)).await.unwrap();
            f.categories.delete(f.admin, c.id).await.unwrap();
        }
        let v = f.venues.create(f.admin, venue("Jazz Cellar")).await.unwrap();
        f.venues.delete(f.admin, v.id).await.unwrap();
        let p = f
            .pages
            .create(
                f.admin,
                PageRequest {
                    title: "About".into(),
                    slug: None,
                    content: "...".into(),
                    is_published: false,
                },
            )
            .await
            .unwrap();
        f.pages.delete(f.admin, p.id).await.unwrap();
        // active rows never show up
        f.categories.create(f.admin, category("Jazz Live")).await.unwrap();

        let all = f.trash.list(&TrashQuery::default()).await.unwrap();
        assert_eq!(all.total, 5);
        assert_eq!(all.data[0].kind, "page");
        assert_eq!(all.data[0].label, "About");
        assert_eq!(all.data[0].deleted_by_name.as_deref(), Some("Root Admin"));

        let jazz = f
            .trash
            .list(&TrashQuery {
                search: Some("jAzZ".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(jazz.total, 3);

        let jazz_categories = f
            .trash
            .list(&TrashQuery {
                kind: Some("category".into()),
                search: Some("jazz".into()),
                per_page: Some(1),
                page: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(jazz_categories.total, 2);
        assert_eq!(jazz_categories.total_pages, 2);
        assert_eq!(jazz_categories.data.len(), 1);
        assert_eq!(jazz_categories.data[0].kind, "category");

        let counts = f.trash.counts().await.unwrap();
        assert_eq!(counts.total, 5);
        let cat_count = counts
            .counts
            .iter()
            .find(|c| c.kind == TrashKind::Category)
            .unwrap();
        assert_eq!(cat_count.count, 3);
    }

    #[tokio::test]
    async fn test_bulk_operations_skip_unresolved_items() {
        let f = fixture().await;
        let a = f.categories.create(f.admin, category("A")).await.unwrap();
        let b = f.categories.create(f.admin, category("B")).await.unwrap();
        let v = f.venues.create(f.admin, venue("Hall")).await.unwrap();
        f.categories.delete(f.admin, a.id).await.unwrap();
        f.categories.delete(f.admin, b.id).await.unwrap();
        f.venues.delete(f.admin, v.id).await.unwrap();

        let items = vec![
            TrashItemRef {
                kind: "category".into(),
                id: a.id,
            },
            TrashItemRef {
                kind: "gadget".into(),
                id: 1,
            },
            TrashItemRef {
                kind: "venue".into(),
                id: 9999,
            },
        ];
        let res = f.trash.bulk_restore(f.admin, &items).await.unwrap();
        assert_eq!(res.processed, 1);
        assert_eq!(res.skipped.len(), 2);
        assert!(categories::Entity::find_active_by_id(a.id)
            .one(&f.pool)
            .await
            .unwrap()
            .is_some());

        let res = f
            .trash
            .bulk_force_delete(
                f.admin,
                &[
                    TrashItemRef {
                        kind: "category".into(),
                        id: b.id,
                    },
                    TrashItemRef {
                        kind: "category".into(),
                        id: a.id, // active again
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(res.processed, 1);
        assert_eq!(res.skipped[0].id, a.id);

        assert_eq!(f.trash.empty(f.admin, Some("venue")).await.unwrap(), 1);
        assert_eq!(f.trash.empty(f.admin, None).await.unwrap(), 0);
        assert_eq!(f.trash.counts().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_child_waits_for_trashed_parent() {
        let f = fixture().await;
        let parent = f.categories.create(f.admin, category("Music")).await.unwrap();
        let child = f
            .categories
            .create(
                f.admin,
                CategoryRequest {
                    parent_id: Some(parent.id),
                    ..category("Jazz")
                },
            )
            .await
            .unwrap();
        f.categories.delete(f.admin, child.id).await.unwrap();
        f.categories.delete(f.admin, parent.id).await.unwrap();

        assert!(matches!(
            f.trash.restore(f.admin, "category", child.id).await,
            Err(AppError::BusinessRule(_))
        ));
        assert!(
            categories::Entity::find_active_by_id(child.id)
                .one(&f.pool)
                .await
                .unwrap()
                .is_none()
        );

        // child listed first; it is retried once the parent is back
        let res = f
            .trash
            .bulk_restore(
                f.admin,
                &[
                    TrashItemRef {
                        kind: "category".into(),
                        id: child.id,
                    },
                    TrashItemRef {
                        kind: "category".into(),
                        id: parent.id,
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(res.processed, 2);
        assert!(res.skipped.is_empty());
        assert_eq!(f.categories.list(&ListQuery::default()).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_bulk_restore_skips_child_of_parent_left_in_bin() {
        let f = fixture().await;
        let parent = f.categories.create(f.admin, category("Sports")).await.unwrap();
        let child = f
            .categories
            .create(
                f.admin,
                CategoryRequest {
                    parent_id: Some(parent.id),
                    ..category("Chess")
                },
            )
            .await
            .unwrap();
        f.categories.delete(f.admin, child.id).await.unwrap();
        f.categories.delete(f.admin, parent.id).await.unwrap();

        let item = TrashItemRef {
            kind: "category".into(),
            id: child.id,
        };
        let res = f
            .trash
            .bulk_restore(f.admin, std::slice::from_ref(&item))
            .await
            .unwrap();
        assert_eq!(res.processed, 0);
        assert_eq!(res.skipped, vec![item]);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let f = fixture().await;
        for name in ["50% Off Club", "Workshops", "Early_Birds", "EarlyXBirds"] {
            let c = f.categories.create(f.admin, category(name)).await.unwrap();
            f.categories.delete(f.admin, c.id).await.unwrap();
        }

        let percent = f
            .trash
            .list(&TrashQuery {
                search: Some("50%".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(percent.total, 1);
        assert_eq!(percent.data[0].label, "50% Off Club");

        let underscore = f
            .trash
            .list(&TrashQuery {
                search: Some("early_".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(underscore.total, 1);
        assert_eq!(underscore.data[0].label, "Early_Birds");
    }

    #[tokio::test]
    async fn test_huge_page_number_returns_empty_page() {
        let f = fixture().await;
        let c = f.categories.create(f.admin, category("Film")).await.unwrap();
        f.categories.delete(f.admin, c.id).await.unwrap();

        let res = f
            .trash
            .list(&TrashQuery {
                page: Some(u64::MAX / 50),
                per_page: Some(100),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(res.total, 1);
        assert!(res.data.is_empty());
    }

    #[tokio::test]
    async fn test_surveys_go_through_the_bin() {
        let f = fixture().await;
        let surveys = SurveyService::new(f.pool.clone(), ActivityLogService::new(f.pool.clone()));
        let s = surveys
            .create(
                f.admin,
                SurveyRequest {
                    title: "Exit poll".into(),
                    description: None,
                    event_id: None,
                    opens_at: None,
                    closes_at: None,
                    is_active: None,
                },
            )
            .await
            .unwrap();
        surveys.delete(f.admin, s.id).await.unwrap();

        let listed = f
            .trash
            .list(&TrashQuery {
                kind: Some("survey".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.data[0].label, "Exit poll");

        f.trash.restore(f.admin, "survey", s.id).await.unwrap();
        assert_eq!(surveys.get(s.id).await.unwrap().title, "Exit poll");
        assert!(matches!(
            f.trash.restore(f.admin, "review", 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
