//! Workflow stage records: planting activities and transport runs logged
//! against a plan, logistics shipments logged against an order. Each kind
//! supports create, paged list and delete; stage rows are append-style
//! evidence and are never edited in place.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::entities::{logistics_record, order, planting_record, transport_record};
use crate::error::ServiceError;
use crate::plans;
use crate::query::{self, render_datetime, render_datetime_opt, PageRequest, PageResult};

/// Planting activities: sowing, fertilizing, harvesting and the like.
pub mod planting {
    use super::*;

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct NewPlantingRecord {
        pub plan_id: String,
        pub activity: String,
        pub operator: Option<String>,
        pub operated_at: Option<DateTime<Utc>>,
        pub remarks: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct PlantingView {
        pub id: String,
        pub plan_id: String,
        pub activity: String,
        pub operator: Option<String>,
        pub operated_at: String,
        pub remarks: Option<String>,
        pub created_at: String,
    }

    impl From<planting_record::Model> for PlantingView {
        fn from(model: planting_record::Model) -> Self {
            PlantingView {
                operated_at: render_datetime_opt(model.operated_at),
                created_at: render_datetime(&model.created_at),
                id: model.id,
                plan_id: model.plan_id,
                activity: model.activity,
                operator: model.operator,
                remarks: model.remarks,
            }
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewPlantingRecord,
    ) -> Result<PlantingView, ServiceError> {
        if input.activity.trim().is_empty() {
            return Err(ServiceError::validation("activity must not be empty"));
        }
        plans::find(db, &input.plan_id).await?;

        let model = planting_record::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            plan_id: Set(input.plan_id),
            activity: Set(input.activity),
            operator: Set(input.operator),
            operated_at: Set(input.operated_at),
            remarks: Set(input.remarks),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(record_id = %model.id, plan_id = %model.plan_id, "logged planting activity");
        Ok(PlantingView::from(model))
    }

    pub async fn list(
        db: &DatabaseConnection,
        plan_id: Option<&str>,
        page: &PageRequest,
    ) -> Result<PageResult<PlantingView>, ServiceError> {
        let mut select = planting_record::Entity::find();
        if let Some(plan_id) = plan_id {
            select = query::filter_eq(select, &[("plan_id", plan_id)])?;
        }
        Ok(query::page_with_order(db, select, page).await?)
    }

    pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
        let model = planting_record::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Planting record", id))?;
        model.delete(db).await?;
        Ok(())
    }
}

/// Transport runs moving harvested material from field to plant.
pub mod transport {
    use super::*;

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct NewTransportRecord {
        pub plan_id: String,
        pub vehicle_no: String,
        pub driver: Option<String>,
        pub origin: Option<String>,
        pub destination: Option<String>,
        pub departed_at: Option<DateTime<Utc>>,
        pub arrived_at: Option<DateTime<Utc>>,
        pub remarks: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct TransportView {
        pub id: String,
        pub plan_id: String,
        pub vehicle_no: String,
        pub driver: Option<String>,
        pub origin: Option<String>,
        pub destination: Option<String>,
        pub departed_at: String,
        pub arrived_at: String,
        pub remarks: Option<String>,
        pub created_at: String,
    }

    impl From<transport_record::Model> for TransportView {
        fn from(model: transport_record::Model) -> Self {
            TransportView {
                departed_at: render_datetime_opt(model.departed_at),
                arrived_at: render_datetime_opt(model.arrived_at),
                created_at: render_datetime(&model.created_at),
                id: model.id,
                plan_id: model.plan_id,
                vehicle_no: model.vehicle_no,
                driver: model.driver,
                origin: model.origin,
                destination: model.destination,
                remarks: model.remarks,
            }
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewTransportRecord,
    ) -> Result<TransportView, ServiceError> {
        if input.vehicle_no.trim().is_empty() {
            return Err(ServiceError::validation("vehicle_no must not be empty"));
        }
        if let (Some(departed), Some(arrived)) = (&input.departed_at, &input.arrived_at) {
            if arrived < departed {
                return Err(ServiceError::validation(
                    "arrived_at must not precede departed_at",
                ));
            }
        }
        plans::find(db, &input.plan_id).await?;

        let model = transport_record::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            plan_id: Set(input.plan_id),
            vehicle_no: Set(input.vehicle_no),
            driver: Set(input.driver),
            origin: Set(input.origin),
            destination: Set(input.destination),
            departed_at: Set(input.departed_at),
            arrived_at: Set(input.arrived_at),
            remarks: Set(input.remarks),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(record_id = %model.id, plan_id = %model.plan_id, "logged transport run");
        Ok(TransportView::from(model))
    }

    pub async fn list(
        db: &DatabaseConnection,
        plan_id: Option<&str>,
        page: &PageRequest,
    ) -> Result<PageResult<TransportView>, ServiceError> {
        let mut select = transport_record::Entity::find();
        if let Some(plan_id) = plan_id {
            select = query::filter_eq(select, &[("plan_id", plan_id)])?;
        }
        Ok(query::page_with_order(db, select, page).await?)
    }

    pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
        let model = transport_record::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Transport record", id))?;
        model.delete(db).await?;
        Ok(())
    }
}

/// Finished-goods shipments carried out against an order.
pub mod logistics {
    use super::*;

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct NewLogisticsRecord {
        pub order_id: String,
        pub carrier: String,
        pub tracking_no: Option<String>,
        pub shipped_at: Option<DateTime<Utc>>,
        pub delivered_at: Option<DateTime<Utc>>,
        pub remarks: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct LogisticsView {
        pub id: String,
        pub order_id: String,
        pub carrier: String,
        pub tracking_no: Option<String>,
        pub shipped_at: String,
        pub delivered_at: String,
        pub remarks: Option<String>,
        pub created_at: String,
    }

    impl From<logistics_record::Model> for LogisticsView {
        fn from(model: logistics_record::Model) -> Self {
            LogisticsView {
                shipped_at: render_datetime_opt(model.shipped_at),
                delivered_at: render_datetime_opt(model.delivered_at),
                created_at: render_datetime(&model.created_at),
                id: model.id,
                order_id: model.order_id,
                carrier: model.carrier,
                tracking_no: model.tracking_no,
                remarks: model.remarks,
            }
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewLogisticsRecord,
    ) -> Result<LogisticsView, ServiceError> {
        if input.carrier.trim().is_empty() {
            return Err(ServiceError::validation("carrier must not be empty"));
        }
        order::Entity::find_by_id(&input.order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", &input.order_id))?;

        let model = logistics_record::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            order_id: Set(input.order_id),
            carrier: Set(input.carrier),
            tracking_no: Set(input.tracking_no),
            shipped_at: Set(input.shipped_at),
            delivered_at: Set(input.delivered_at),
            remarks: Set(input.remarks),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(record_id = %model.id, order_id = %model.order_id, "logged shipment");
        Ok(LogisticsView::from(model))
    }

    pub async fn list(
        db: &DatabaseConnection,
        order_id: Option<&str>,
        page: &PageRequest,
    ) -> Result<PageResult<LogisticsView>, ServiceError> {
        let mut select = logistics_record::Entity::find();
        if let Some(order_id) = order_id {
            select = query::filter_eq(select, &[("order_id", order_id)])?;
        }
        Ok(query::page_with_order(db, select, page).await?)
    }

    pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
        let model = logistics_record::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Logistics record", id))?;
        model.delete(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{self, NewOrder};
    use crate::plans::NewPlan;
    use crate::{clients, db};

    async fn test_db() -> DatabaseConnection {
        db::connect_in_memory().await.unwrap()
    }

    async fn seed_plan(db: &DatabaseConnection) -> String {
        let plan = crate::plans::create(
            db,
            NewPlan {
                crop: "camellia".to_string(),
                ..NewPlan::default()
            },
        )
        .await
        .unwrap();
        plan.id
    }

    async fn seed_order(db: &DatabaseConnection) -> String {
        let client = clients::create(
            db,
            clients::NewClient {
                name: "Oil Mill Ltd".to_string(),
                contact: None,
                phone: None,
                region: None,
                channel: None,
            },
        )
        .await
        .unwrap();
        let placed = orders::create(
            db,
            NewOrder {
                order_no: "SO-20260301-001".to_string(),
                client_id: Some(client.id),
                channel: None,
                product_name: "camellia oil 500ml".to_string(),
                quantity: 10,
                amount_cents: 128_000,
            },
        )
        .await
        .unwrap();
        placed.id
    }

    #[tokio::test]
    async fn test_planting_create_and_list() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;

        for activity in ["sow", "fertilize", "harvest"] {
            planting::create(
                &db,
                planting::NewPlantingRecord {
                    plan_id: plan_id.clone(),
                    activity: activity.to_string(),
                    operator: Some("Zhang Wei".to_string()),
                    ..planting::NewPlantingRecord::default()
                },
            )
            .await
            .unwrap();
        }

        let result = planting::list(&db, Some(&plan_id), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(result.total, 3);

        let other = planting::list(&db, Some("other-plan"), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(other.total, 0);
    }

    #[tokio::test]
    async fn test_planting_requires_existing_plan() {
        let db = test_db().await;
        let result = planting::create(
            &db,
            planting::NewPlantingRecord {
                plan_id: "ghost".to_string(),
                activity: "sow".to_string(),
                ..planting::NewPlantingRecord::default()
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_planting_blank_activity_rejected() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;
        let result = planting::create(
            &db,
            planting::NewPlantingRecord {
                plan_id,
                activity: "   ".to_string(),
                ..planting::NewPlantingRecord::default()
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_transport_rejects_reversed_times() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;
        let departed = Utc::now();
        let result = transport::create(
            &db,
            transport::NewTransportRecord {
                plan_id,
                vehicle_no: "ZJ-A12345".to_string(),
                departed_at: Some(departed),
                arrived_at: Some(departed - chrono::Duration::hours(2)),
                ..transport::NewTransportRecord::default()
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_transport_create_renders_times() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;
        let view = transport::create(
            &db,
            transport::NewTransportRecord {
                plan_id,
                vehicle_no: "ZJ-A12345".to_string(),
                driver: Some("Li Na".to_string()),
                origin: Some("east-slope-3".to_string()),
                destination: Some("pressing plant".to_string()),
                departed_at: Some(Utc::now()),
                ..transport::NewTransportRecord::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(view.departed_at.len(), 19);
        assert_eq!(view.arrived_at, "");
    }

    #[tokio::test]
    async fn test_logistics_tied_to_order() {
        let db = test_db().await;
        let order_id = seed_order(&db).await;

        let view = logistics::create(
            &db,
            logistics::NewLogisticsRecord {
                order_id: order_id.clone(),
                carrier: "SF Express".to_string(),
                tracking_no: Some("SF1443021998".to_string()),
                ..logistics::NewLogisticsRecord::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(view.order_id, order_id);

        let missing = logistics::create(
            &db,
            logistics::NewLogisticsRecord {
                order_id: "ghost".to_string(),
                carrier: "SF Express".to_string(),
                ..logistics::NewLogisticsRecord::default()
            },
        )
        .await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_round_trip() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;
        let record = planting::create(
            &db,
            planting::NewPlantingRecord {
                plan_id: plan_id.clone(),
                activity: "sow".to_string(),
                ..planting::NewPlantingRecord::default()
            },
        )
        .await
        .unwrap();

        planting::remove(&db, &record.id).await.unwrap();
        assert!(matches!(
            planting::remove(&db, &record.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
