use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use models::subscription;

use crate::subscription::domain::{NewSubscription, Subscription, SubscriptionFilter};
use crate::subscription::errors::StoreError;
use crate::subscription::repository::SubscriptionRepository;

pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl From<subscription::Model> for Subscription {
    fn from(m: subscription::Model) -> Self {
        Self {
            id: m.id,
            service_name: m.service_name,
            price: m.price,
            user_id: m.user_id,
            start_date: m.start_date,
            end_date: m.end_date,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// `SELECT SUM(price)` restricted to rows overlapping the filter window.
pub fn total_cost_query(filter: &SubscriptionFilter) -> Select<subscription::Entity> {
    let mut select = subscription::Entity::find()
        .select_only()
        .column_as(Expr::col((subscription::Entity, subscription::Column::Price)).sum(), "total")
        .filter(subscription::Column::StartDate.lte(filter.end_date))
        .filter(
            Condition::any()
                .add(subscription::Column::EndDate.is_null())
                .add(subscription::Column::EndDate.gte(filter.start_date)),
        );
    if let Some(user_id) = filter.user_id {
        select = select.filter(subscription::Column::UserId.eq(user_id));
    }
    if let Some(name) = &filter.service_name {
        select = select.filter(subscription::Column::ServiceName.eq(name.clone()));
    }
    select
}

/// Newest-first page, optionally restricted to one owner.
pub fn list_query(user_id: Option<Uuid>, limit: u64, offset: u64) -> Select<subscription::Entity> {
    let mut select = subscription::Entity::find();
    if let Some(u) = user_id {
        select = select.filter(subscription::Column::UserId.eq(u));
    }
    select
        .order_by_desc(subscription::Column::CreatedAt)
        .order_by_desc(subscription::Column::Id)
        .limit(limit)
        .offset(offset)
}

#[async_trait::async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, new: NewSubscription) -> Result<Subscription, StoreError> {
        let now = Utc::now().into();
        let am = subscription::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_name: Set(new.service_name),
            price: Set(new.price),
            user_id: Set(new.user_id),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = am.insert(&self.db).await?;
        Ok(created.into())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, StoreError> {
        subscription::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Subscription::from)
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, sub: Subscription) -> Result<Subscription, StoreError> {
        // Read-then-write in one transaction; dropping `txn` on error rolls back.
        let txn = self.db.begin().await?;
        let mut am: subscription::ActiveModel = subscription::Entity::find_by_id(sub.id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound)?
            .into();
        am.service_name = Set(sub.service_name);
        am.price = Set(sub.price);
        am.start_date = Set(sub.start_date);
        am.end_date = Set(sub.end_date);
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&txn).await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let res = subscription::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, user_id: Option<Uuid>, limit: u64, offset: u64) -> Result<(Vec<Subscription>, u64), StoreError> {
        let rows = list_query(user_id, limit, offset).all(&self.db).await?;
        let count = rows.len() as u64;
        Ok((rows.into_iter().map(Subscription::from).collect(), count))
    }

    async fn total_cost(&self, filter: SubscriptionFilter) -> Result<i64, StoreError> {
        let total: Option<Option<i64>> = total_cost_query(&filter).into_tuple().one(&self.db).await?;
        Ok(total.flatten().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DbBackend, QueryTrait};

    fn window() -> SubscriptionFilter {
        SubscriptionFilter {
            user_id: None,
            service_name: None,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        }
    }

    #[test]
    fn total_cost_sql_encodes_overlap_predicate() {
        let sql = total_cost_query(&window()).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#"SUM("subscriptions"."price") AS "total""#), "{sql}");
        assert!(sql.contains(r#""subscriptions"."start_date" <= '2024-12-01'"#), "{sql}");
        assert!(
            sql.contains(r#"("subscriptions"."end_date" IS NULL OR "subscriptions"."end_date" >= '2024-06-01')"#),
            "{sql}"
        );
        assert!(!sql.contains("user_id"), "{sql}");
        assert!(!sql.contains("service_name"), "{sql}");
    }

    #[test]
    fn total_cost_sql_adds_optional_filters() {
        let mut f = window();
        f.user_id = Some(Uuid::nil());
        f.service_name = Some("Netflix".into());
        let sql = total_cost_query(&f).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""subscriptions"."user_id" = '00000000-0000-0000-0000-000000000000'"#), "{sql}");
        assert!(sql.contains(r#""subscriptions"."service_name" = 'Netflix'"#), "{sql}");
    }

    #[test]
    fn list_sql_orders_newest_first_and_pages() {
        let sql = list_query(None, 20, 40).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#"ORDER BY "subscriptions"."created_at" DESC"#), "{sql}");
        assert!(sql.contains("LIMIT 20"), "{sql}");
        assert!(sql.contains("OFFSET 40"), "{sql}");
    }

    mod db {
        use super::*;
        use crate::subscription::filter::build_filter;
        use crate::test_support::get_db;

        fn new_sub(user_id: Uuid, service: &str, price: i32, start: &str, end: Option<&str>) -> NewSubscription {
            NewSubscription {
                service_name: service.into(),
                price,
                user_id,
                start_date: models::period::parse_period(start).unwrap(),
                end_date: end.map(|e| models::period::parse_period(e).unwrap()),
            }
        }

        #[tokio::test]
        async fn subscription_crud_seaorm() -> Result<(), anyhow::Error> {
            let Some(db) = get_db().await? else { return Ok(()) };
            let repo = SeaOrmSubscriptionRepository { db };
            let uid = Uuid::new_v4();

            let created = repo.create(new_sub(uid, "Netflix", 799, "01-2024", None)).await?;
            let found = repo.get_by_id(created.id).await?;
            assert_eq!(found.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
            assert_eq!(found.end_date, None);

            let mut changed = found.clone();
            changed.price = 999;
            changed.end_date = Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
            let updated = repo.update(changed).await?;
            assert_eq!(updated.price, 999);
            assert!(updated.updated_at >= found.updated_at);

            let (page, count) = repo.list(Some(uid), 20, 0).await?;
            assert_eq!(count, 1);
            assert_eq!(page[0].id, created.id);

            repo.delete(created.id).await?;
            assert!(matches!(repo.get_by_id(created.id).await, Err(StoreError::NotFound)));
            assert!(matches!(repo.delete(created.id).await, Err(StoreError::NotFound)));
            Ok(())
        }

        #[tokio::test]
        async fn total_cost_seaorm_matches_reference_predicate() -> Result<(), anyhow::Error> {
            let Some(db) = get_db().await? else { return Ok(()) };
            let repo = SeaOrmSubscriptionRepository { db };
            let uid = Uuid::new_v4();
            let a = repo.create(new_sub(uid, "Netflix", 799, "01-2024", Some("06-2024"))).await?;
            let b = repo.create(new_sub(uid, "Spotify", 199, "03-2024", None)).await?;

            let f = build_filter(Some(uid), None, "06-2024", "12-2024")?;
            assert_eq!(repo.total_cost(f).await?, 998);
            let f = build_filter(Some(uid), None, "07-2024", "12-2024")?;
            assert_eq!(repo.total_cost(f).await?, 199);
            let f = build_filter(Some(uid), Some("Nope".into()), "01-2024", "12-2024")?;
            assert_eq!(repo.total_cost(f).await?, 0);

            repo.delete(a.id).await?;
            repo.delete(b.id).await?;
            Ok(())
        }

        #[tokio::test]
        async fn update_missing_row_is_not_found() -> Result<(), anyhow::Error> {
            let Some(db) = get_db().await? else { return Ok(()) };
            let repo = SeaOrmSubscriptionRepository { db };
            let ghost = Subscription {
                id: Uuid::new_v4(),
                service_name: "Ghost".into(),
                price: 1,
                user_id: Uuid::new_v4(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            assert!(matches!(repo.update(ghost).await, Err(StoreError::NotFound)));
            Ok(())
        }
    }
}
