#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use hr_desk::repository::{Repositories, memory::MemoryStore};
use serde_json::{Value, json};
use uuid::Uuid;

const ADMIN: u8 = 1;
const HR: u8 = 2;
const EMPLOYEE: u8 = 3;

fn leave_body() -> Value {
    json!({
        "leave_type": "annual",
        "start_date": "2024-01-01",
        "end_date": "2024-01-03",
        "reason": "Family trip"
    })
}

#[actix_web::test]
async fn submit_requires_a_token() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app!(Repositories::memory(store.clone()));

    let req = test::TestRequest::post().uri("/api/leave").set_json(leave_body()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/leave")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn submit_without_linked_employee_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app!(Repositories::memory(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .insert_header(common::bearer(Uuid::new_v4(), EMPLOYEE))
        .set_json(leave_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No employee profile linked to this user");
}

#[actix_web::test]
async fn submit_creates_pending_request_for_own_profile() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app!(Repositories::memory(store.clone()));
    let user = Uuid::new_v4();
    let emp = common::seed_employee(&store, "E1", Some(user)).await;

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .insert_header(common::bearer(user, EMPLOYEE))
        .set_json(leave_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["employee_id"], emp.id);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["leave_type"], "annual");
    assert_eq!(body["reason"], "Family trip");
    assert_eq!(body["duration_days"], 3);
}

#[actix_web::test]
async fn reversed_dates_are_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app!(Repositories::memory(store.clone()));
    let user = Uuid::new_v4();
    common::seed_employee(&store, "E1", Some(user)).await;

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .insert_header(common::bearer(user, EMPLOYEE))
        .set_json(json!({
            "leave_type": "sick",
            "start_date": "2024-01-05",
            "end_date": "2024-01-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "start_date cannot be after end_date");
}

#[actix_web::test]
async fn only_pending_requests_can_be_resolved() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app!(Repositories::memory(store.clone()));
    let user = Uuid::new_v4();
    common::seed_employee(&store, "E1", Some(user)).await;

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .insert_header(common::bearer(user, EMPLOYEE))
        .set_json(leave_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    // employees cannot review
    let req = test::TestRequest::put()
        .uri(&format!("/api/leave/{id}/approve"))
        .insert_header(common::bearer(user, EMPLOYEE))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/leave/{id}/approve"))
        .insert_header(common::bearer(Uuid::new_v4(), HR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "approved");

    let req = test::TestRequest::put()
        .uri(&format!("/api/leave/{id}/reject"))
        .insert_header(common::bearer(Uuid::new_v4(), ADMIN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Leave request already processed");

    let req = test::TestRequest::put()
        .uri("/api/leave/777/reject")
        .insert_header(common::bearer(Uuid::new_v4(), ADMIN))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_is_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app!(Repositories::memory(store.clone()));
    let user = Uuid::new_v4();
    common::seed_employee(&store, "E1", Some(user)).await;

    for leave_type in ["annual", "sick"] {
        let req = test::TestRequest::post()
            .uri("/api/leave")
            .insert_header(common::bearer(user, EMPLOYEE))
            .set_json(json!({
                "leave_type": leave_type,
                "start_date": "2024-03-01",
                "end_date": "2024-03-01"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/leave")
        .insert_header(common::bearer(user, EMPLOYEE))
        .to_request();
    let list: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["leave_type"], "sick");
    assert_eq!(list[1]["leave_type"], "annual");
    assert_eq!(list[0]["duration_days"], 1);
    assert_eq!(list[0]["reason"], Value::Null);
}
