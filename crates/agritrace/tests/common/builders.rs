//! Seed helpers for creating test data programmatically.
//!
//! Every helper goes through the public service functions, so seeded
//! rows pass the same validation real callers hit.

#![allow(dead_code)]

use sea_orm::DatabaseConnection;

use agritrace::clients::{self, ClientView, NewClient};
use agritrace::orders::{self, NewOrder, OrderView};
use agritrace::plans::{self, NewPlan, PlanView};

/// A business client with every optional field filled in.
pub fn client_input(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        contact: Some("Chen Wei".to_string()),
        phone: Some("13800000000".to_string()),
        region: Some("Hunan".to_string()),
        channel: Some("b2b".to_string()),
    }
}

/// A production plan for the given crop, optionally tied to a client.
pub fn plan_input(crop: &str, client_id: Option<&str>) -> NewPlan {
    NewPlan {
        crop: crop.to_string(),
        client_id: client_id.map(str::to_string),
        plot: Some("east-slope-3".to_string()),
        planned_yield_kg: Some(1200),
        season: Some("2026".to_string()),
    }
}

/// A sales order for half a pallet of oil.
pub fn order_input(order_no: &str, client_id: Option<&str>) -> NewOrder {
    NewOrder {
        order_no: order_no.to_string(),
        client_id: client_id.map(str::to_string),
        channel: Some("b2b".to_string()),
        product_name: "camellia oil 500ml".to_string(),
        quantity: 24,
        amount_cents: 288_000,
    }
}

pub async fn seed_client(db: &DatabaseConnection, name: &str) -> ClientView {
    clients::create(db, client_input(name))
        .await
        .expect("Failed to seed client")
}

pub async fn seed_plan(db: &DatabaseConnection, client_id: Option<&str>) -> PlanView {
    plans::create(db, plan_input("camellia", client_id))
        .await
        .expect("Failed to seed plan")
}

pub async fn seed_order(db: &DatabaseConnection, order_no: &str) -> OrderView {
    orders::create(db, order_input(order_no, None))
        .await
        .expect("Failed to seed order")
}
