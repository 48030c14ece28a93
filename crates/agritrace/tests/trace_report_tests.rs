//! Trace code tests covering the consumer-facing chain report.
//!
//! A scanned code must resolve into the whole production history of its
//! batch: plan, field work, transport runs, warehouse processing and
//! outbound shipments, each stage oldest first.

mod common;

use agritrace::stages::logistics::{self, NewLogisticsRecord};
use agritrace::stages::planting::{self, NewPlantingRecord};
use agritrace::stages::transport::{self, NewTransportRecord};
use agritrace::trace::{self, NewTraceCode};
use agritrace::warehouse::{NewWarehouseJob, SegmentKind, SegmentUpdate};
use agritrace::{plans, ServiceError};

use common::{seed_client, seed_order, seed_plan, TestHarness};

#[tokio::test]
async fn test_lookup_assembles_the_full_chain() {
    let harness = TestHarness::new().await;
    let db = &harness.db;

    let client = seed_client(db, "Harvest Lane Trading").await;
    let plan = seed_plan(db, Some(&client.id)).await;
    let order = seed_order(db, "SO-2026-0042").await;

    for activity in ["sowing", "weeding"] {
        planting::create(
            db,
            NewPlantingRecord {
                plan_id: plan.id.clone(),
                activity: activity.to_string(),
                operator: Some("Liu Fang".to_string()),
                ..NewPlantingRecord::default()
            },
        )
        .await
        .unwrap();
    }
    transport::create(
        db,
        NewTransportRecord {
            plan_id: plan.id.clone(),
            vehicle_no: "VAN-204".to_string(),
            origin: Some("east-slope-3".to_string()),
            destination: Some("pressing plant".to_string()),
            ..NewTransportRecord::default()
        },
    )
    .await
    .unwrap();
    logistics::create(
        db,
        NewLogisticsRecord {
            order_id: order.id.clone(),
            carrier: "SF Express".to_string(),
            tracking_no: Some("SF1443021998".to_string()),
            ..NewLogisticsRecord::default()
        },
    )
    .await
    .unwrap();

    let service = harness.warehouse();
    let job = service
        .create_job(NewWarehouseJob {
            product_name: "camellia oil 500ml".to_string(),
            batch_no: Some("B-2026-014".to_string()),
            order_id: Some(order.id.clone()),
            plan_id: Some(plan.id.clone()),
        })
        .await
        .unwrap();
    service
        .update_segment(
            &job.job.id,
            SegmentKind::Feed,
            SegmentUpdate {
                completed: Some(true),
                ..SegmentUpdate::default()
            },
        )
        .await
        .unwrap();

    trace::register(
        db,
        NewTraceCode {
            code: "TRC-2026-00042".to_string(),
            plan_id: plan.id.clone(),
            order_id: Some(order.id.clone()),
        },
    )
    .await
    .unwrap();

    let report = trace::lookup(db, "TRC-2026-00042").await.unwrap();
    assert_eq!(report.code, "TRC-2026-00042");
    assert_eq!(report.plan.expect("plan should be present").id, plan.id);

    assert_eq!(report.planting.len(), 2);
    assert_eq!(report.planting[0].activity, "sowing");
    assert_eq!(report.planting[1].activity, "weeding");

    assert_eq!(report.transport.len(), 1);
    assert_eq!(report.transport[0].vehicle_no, "VAN-204");

    assert_eq!(report.warehouse.len(), 1);
    assert_eq!(report.warehouse[0].job.status, "in_progress");
    assert_eq!(report.warehouse[0].segments.len(), 5);
    assert!(report.warehouse[0].segments[SegmentKind::Feed.index()].completed);

    assert_eq!(report.logistics.len(), 1);
    assert_eq!(report.logistics[0].carrier, "SF Express");
}

#[tokio::test]
async fn test_lookup_without_order_skips_logistics() {
    let harness = TestHarness::new().await;
    let db = &harness.db;

    let plan = seed_plan(db, None).await;
    let order = seed_order(db, "SO-2026-0077").await;
    // A shipment exists, but the code was issued without an order, so
    // the report must not pick it up.
    logistics::create(
        db,
        NewLogisticsRecord {
            order_id: order.id.clone(),
            carrier: "ZTO".to_string(),
            ..NewLogisticsRecord::default()
        },
    )
    .await
    .unwrap();

    trace::register(
        db,
        NewTraceCode {
            code: "TRC-2026-00077".to_string(),
            plan_id: plan.id.clone(),
            order_id: None,
        },
    )
    .await
    .unwrap();

    let report = trace::lookup(db, "TRC-2026-00077").await.unwrap();
    assert!(report.logistics.is_empty());
}

#[tokio::test]
async fn test_lookup_keeps_history_after_plan_deletion() {
    let harness = TestHarness::new().await;
    let db = &harness.db;

    let plan = seed_plan(db, None).await;
    planting::create(
        db,
        NewPlantingRecord {
            plan_id: plan.id.clone(),
            activity: "harvest".to_string(),
            ..NewPlantingRecord::default()
        },
    )
    .await
    .unwrap();
    trace::register(
        db,
        NewTraceCode {
            code: "TRC-2026-00099".to_string(),
            plan_id: plan.id.clone(),
            order_id: None,
        },
    )
    .await
    .unwrap();

    plans::remove(db, &plan.id).await.unwrap();

    let report = trace::lookup(db, "TRC-2026-00099").await.unwrap();
    assert!(report.plan.is_none());
    assert_eq!(report.planting.len(), 1);
}

#[tokio::test]
async fn test_code_collisions_rejected_across_plans() {
    let harness = TestHarness::new().await;
    let db = &harness.db;

    let first = seed_plan(db, None).await;
    let second = seed_plan(db, None).await;

    trace::register(
        db,
        NewTraceCode {
            code: "TRC-2026-00123".to_string(),
            plan_id: first.id.clone(),
            order_id: None,
        },
    )
    .await
    .unwrap();

    let clash = trace::register(
        db,
        NewTraceCode {
            code: "TRC-2026-00123".to_string(),
            plan_id: second.id.clone(),
            order_id: None,
        },
    )
    .await;
    assert!(matches!(clash, Err(ServiceError::Integrity { .. })));
}
