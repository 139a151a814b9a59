//! End-to-end flows over the typed API against a mock backend.
#![cfg(feature = "client")]

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use canteen_client::{
    AddOutcome, Amount, Cart, ClientConfig, Error, FoodCourtId, Gateway, MenuItem, MenuItemId,
    OrderId, OrderStatus, OrderTracker, RegisterRequest, Role, Route, Session, UserId,
};

fn user_json(role: &str) -> Value {
    json!({
        "id": 3,
        "username": "asha",
        "email": "asha@campus.edu",
        "first_name": "Asha",
        "last_name": "Rao",
        "role": role,
        "wallet_balance": "250.00",
        "phone": null,
        "is_blocked": false
    })
}

fn order_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "student": 3,
        "student_name": "Asha Rao",
        "food_court": 7,
        "food_court_name": "North Block",
        "status": status,
        "total_amount": "130.00",
        "items": [
            {"id": 1, "menu_item": 1, "menu_item_name": "Masala Dosa", "quantity": 2, "price": "50.00"},
            {"id": 2, "menu_item": 2, "menu_item_name": "Filter Coffee", "quantity": 1, "price": "30.00"}
        ],
        "created_at": "2025-03-01T12:00:00Z",
        "updated_at": "2025-03-01T12:00:00Z"
    })
}

fn gateway_for(server: &MockServer, session: Session) -> (Gateway, Arc<Mutex<Vec<Route>>>) {
    let routes = Arc::new(Mutex::new(Vec::new()));
    let sink = routes.clone();
    let gateway = Gateway::new(ClientConfig::new(server.uri().parse().unwrap()), session)
        .unwrap()
        .with_navigator(move |route: Route| sink.lock().unwrap().push(route));
    (gateway, routes)
}

fn signed_in() -> Session {
    let session = Session::in_memory();
    session.set_tokens("access", "refresh").unwrap();
    session
}

#[tokio::test]
async fn login_persists_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({"username": "asha", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json("student"),
            "access": "access-1",
            "refresh": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, Session::in_memory());
    let user = gateway.auth().login("asha", "secret").await.unwrap();

    assert_eq!(user.role, Role::Student);
    assert_eq!(Route::Home(user.role).path(), "/student");
    let session = gateway.session();
    assert_eq!(session.access_token().unwrap().as_deref(), Some("access-1"));
    assert_eq!(session.refresh_token().unwrap().as_deref(), Some("refresh-1"));
    assert_eq!(session.user().unwrap(), Some(user));
}

#[tokio::test]
async fn bad_credentials_surface_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Invalid credentials"]
        })))
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, Session::in_memory());
    let err = gateway.auth().login("asha", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.field_errors()["non_field_errors"],
        vec!["Invalid credentials".to_string()]
    );
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn register_always_sends_student_role() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register/"))
        .and(body_json(json!({
            "username": "asha",
            "email": "asha@campus.edu",
            "password": "secret",
            "first_name": "Asha",
            "last_name": "Rao",
            "phone": "9876543210",
            "role": "student"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": user_json("student"),
            "access": "access-1",
            "refresh": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, Session::in_memory());
    let request = RegisterRequest::new("asha", "asha@campus.edu", "secret", "Asha", "Rao")
        .with_phone("9876543210");
    let user = gateway.auth().register(&request).await.unwrap();

    assert_eq!(user.id, UserId(3));
    assert!(gateway.session().is_authenticated());
}

#[tokio::test]
async fn restore_clears_session_when_profile_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, signed_in());
    assert_eq!(gateway.auth().restore().await.unwrap(), None);
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn restore_without_credentials_skips_network() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway_for(&server, Session::in_memory());

    assert_eq!(gateway.auth().restore().await.unwrap(), None);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn restore_caches_fresh_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("food_court_admin")))
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, signed_in());
    let user = gateway.auth().restore().await.unwrap().unwrap();

    assert_eq!(user.role, Role::FoodCourtAdmin);
    assert_eq!(gateway.session().user().unwrap(), Some(user));

    gateway.auth().logout().unwrap();
    assert!(!gateway.session().is_authenticated());
    assert_eq!(gateway.session().user().unwrap(), None);
}

#[tokio::test]
async fn checkout_through_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/student/orders/place/"))
        .and(header("authorization", "Bearer access"))
        .and(body_json(json!({
            "food_court": 7,
            "items": [
                {"menu_item_id": 1, "quantity": 2},
                {"menu_item_id": 2, "quantity": 1}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json(11, "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, routes) = gateway_for(&server, signed_in());
    let dosa = MenuItem::new(MenuItemId(1), FoodCourtId(7), "Masala Dosa", Amount::from_rupees(50));
    let coffee = MenuItem::new(MenuItemId(2), FoodCourtId(7), "Filter Coffee", Amount::from_rupees(30));

    let mut cart = Cart::new();
    cart.add_item(dosa.clone());
    cart.add_item(dosa);
    assert_eq!(cart.add_item(coffee), AddOutcome::Added { quantity: 1 });
    assert_eq!(cart.total(), Amount::from_rupees(130));
    assert_eq!(cart.item_count(), 3);

    let order = cart.checkout(&gateway, gateway.navigator()).await.unwrap();

    assert_eq!(order.id, OrderId(11));
    assert_eq!(order.total_amount, Amount::from_rupees(130));
    assert!(cart.is_empty());
    assert_eq!(cart.food_court(), None);
    assert!(!cart.is_open());
    assert_eq!(*routes.lock().unwrap(), vec![Route::OrderTracking]);
}

#[tokio::test]
async fn insufficient_balance_keeps_cart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/student/orders/place/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Insufficient wallet balance",
            "required": "130.00",
            "available": "20.00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, routes) = gateway_for(&server, signed_in());
    let mut cart = Cart::new();
    cart.add_item(MenuItem::new(MenuItemId(1), FoodCourtId(7), "Masala Dosa", Amount::from_rupees(50)));

    let err = cart.checkout(&gateway, gateway.navigator()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::RequestFailed { status: 400, ref detail, .. } if detail == "Insufficient wallet balance"
    ));
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.food_court(), Some(FoodCourtId(7)));
    assert!(routes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn wallet_top_up_sends_decimal_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/student/wallet/add/"))
        .and(body_json(json!({"amount": "150.00"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balance": "400.00",
            "message": "Wallet recharged successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/student/wallet/balance/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 400.0})))
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, signed_in());
    let recharge = gateway
        .student()
        .add_wallet_balance(Amount::from_rupees(150))
        .await
        .unwrap();
    assert_eq!(recharge.balance, Amount::from_rupees(400));

    let balance = gateway.student().wallet_balance().await.unwrap();
    assert_eq!(balance, Amount::from_rupees(400));
}

#[tokio::test]
async fn non_positive_top_up_is_rejected_locally() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway_for(&server, signed_in());

    let err = gateway
        .student()
        .add_wallet_balance(Amount::ZERO)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidAmount(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_moves_order_along() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/orders/11/status/"))
        .and(body_json(json!({"status": "preparing"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json(11, "preparing")))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, signed_in());
    let order = gateway
        .admin()
        .update_order_status(OrderId(11), OrderStatus::Preparing)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Preparing);
}

#[tokio::test]
async fn super_admin_blocks_user() {
    let server = MockServer::start().await;
    let mut blocked = user_json("student");
    blocked["is_blocked"] = json!(true);
    Mock::given(method("PATCH"))
        .and(path("/superadmin/users/3/block/"))
        .and(body_json(json!({"is_blocked": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(blocked))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, signed_in());
    let user = gateway.super_admin().block_user(UserId(3), true).await.unwrap();

    assert!(user.is_blocked);
}

#[tokio::test]
async fn super_admin_reads_system_analytics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/superadmin/analytics/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_revenue": "15230.50",
            "today_revenue": 820,
            "total_orders": 412,
            "total_students": 96,
            "total_food_courts": 4
        })))
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, signed_in());
    let analytics = gateway.super_admin().analytics().await.unwrap();

    assert_eq!(analytics.total_revenue, Amount::from_paise(1_523_050));
    assert_eq!(analytics.today_revenue, Amount::from_rupees(820));
    assert_eq!(analytics.total_food_courts, 4);
}

#[tokio::test]
async fn tracker_polls_until_break() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/student/orders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            order_json(11, "ready"),
            order_json(10, "completed")
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let (gateway, _) = gateway_for(&server, signed_in());
    let tracker = OrderTracker::new(&gateway).with_interval(Duration::from_millis(20));

    let mut boards = Vec::new();
    tracker
        .watch(|result| {
            boards.push(result.unwrap());
            if boards.len() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await
        .unwrap();

    assert_eq!(boards[0].active.len(), 1);
    assert_eq!(boards[0].past.len(), 1);
    assert_eq!(boards[1], boards[0]);
}

#[tokio::test]
async fn tracker_stops_when_session_expires() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/student/orders/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, routes) = gateway_for(&server, signed_in());
    let tracker = OrderTracker::new(&gateway).with_interval(Duration::from_millis(20));

    let mut updates = 0;
    let err = tracker
        .watch(|_| {
            updates += 1;
            ControlFlow::Continue(())
        })
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(updates, 0);
    assert_eq!(*routes.lock().unwrap(), vec![Route::Login]);
}
