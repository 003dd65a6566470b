//! List controller scenarios against the mock backend

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{matchers::{method, path}, Mock, ResponseTemplate};

use pg_admin::models::{Guest, GuestDraft, RentRecord, Review};
use pg_admin::services::{ApiClient, ResourceApi};
use pg_admin::state::{ListController, LoadStatus, ViewMode};
use pg_admin::utils::errors::PgAdminError;

use crate::helpers::*;

fn api(ctx: &TestContext) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(&ctx.settings.api).unwrap())
}

fn guests(ctx: &TestContext, page_size: usize) -> ListController<Guest> {
    let api: Arc<dyn ResourceApi<Guest>> = api(ctx);
    ListController::paginated(api, page_size)
}

#[tokio::test]
async fn test_zero_amount_is_rejected_without_request() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/getDetailsof/guests", guests_json()).await;
    let mut controller = guests(&ctx, 6);
    controller.load().await.unwrap();

    controller.begin_create().unwrap();
    controller
        .set_draft(GuestDraft { amount_paid: 0.0, ..valid_guest_draft() })
        .unwrap();

    let result = controller.submit().await;
    assert_matches!(&result, Err(PgAdminError::Validation(errors)) if errors.contains("amountPaid"));
    let form = controller.form().expect("form stays open");
    assert_eq!(form.field_errors.get("amountPaid"), Some("Amount paid must be greater than 0"));
    assert_eq!(form.draft.name, "Deepa Menon");
    assert_eq!(ctx.api_mock.count_requests("POST", "/add/guests").await, 0);
}

#[tokio::test]
async fn test_create_reloads_list() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/getDetailsof/guests", guests_json()).await;
    let mut controller = guests(&ctx, 6);
    controller.load().await.unwrap();
    assert_eq!(controller.items().len(), 3);

    // The backend now has the new guest
    ctx.api_mock.reset().await;
    let mut after = guests_json();
    after
        .as_array_mut()
        .unwrap()
        .push(guest_json("g-4", "Deepa Menon", "deepa@example.com"));
    ctx.api_mock.mock_list("/getDetailsof/guests", after).await;
    Mock::given(method("POST"))
        .and(path("/add/guests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "g-4" })))
        .expect(1)
        .mount(&ctx.api_mock.server)
        .await;

    controller.begin_create().unwrap();
    controller.set_draft(valid_guest_draft()).unwrap();
    controller.submit().await.unwrap();

    assert!(controller.mode().is_listing());
    assert_eq!(controller.page(), 1);
    assert_eq!(controller.items().len(), 4);
    assert!(controller.items().iter().any(|g| g.name == "Deepa Menon"));
    assert_eq!(ctx.api_mock.count_requests("GET", "/getDetailsof/guests").await, 1);
}

#[tokio::test]
async fn test_failed_update_keeps_draft_and_shows_error() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/get/payments", rent_json()).await;
    ctx.api_mock
        .mock_status("PUT", "/rent-details/r-2", 500, json!({ "message": "db down" }))
        .await;
    let api: Arc<dyn ResourceApi<RentRecord>> = api(&ctx);
    let mut controller = ListController::new(api);
    controller.load().await.unwrap();

    controller.begin_edit("r-2").unwrap();
    let draft = controller.draft_mut().unwrap();
    draft.notes = "Paid in cash".to_string();
    draft.payment_method = "Cash".to_string();

    assert!(controller.submit().await.is_err());
    let form = controller.form().expect("still editing");
    assert_eq!(form.draft.notes, "Paid in cash");
    assert!(form.submit_error.is_some());
    assert_eq!(form.target.as_ref().map(|t| t.id.as_str()), Some("r-2"));
}

#[tokio::test]
async fn test_rent_note_change_is_kept_in_history() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/get/payments", rent_json()).await;
    Mock::given(method("PUT"))
        .and(path("/rent-details/r-2"))
        .and(wiremock::matchers::body_partial_json(json!({
            "notes": "Paid on the 12th",
            "notesHistory": [{ "note": "Will pay next week" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&ctx.api_mock.server)
        .await;
    let api: Arc<dyn ResourceApi<RentRecord>> = api(&ctx);
    let mut controller = ListController::new(api);
    controller.load().await.unwrap();

    controller.begin_edit("r-2").unwrap();
    controller.draft_mut().unwrap().notes = "Paid on the 12th".to_string();
    controller.submit().await.unwrap();
    assert!(controller.mode().is_listing());
}

#[tokio::test]
async fn test_filter_ignores_case() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/getDetailsof/guests", guests_json()).await;
    let mut controller = guests(&ctx, 6);
    controller.load().await.unwrap();

    let upper: Vec<&str> = controller.filter("ALICE").iter().map(|g| g.id.as_str()).collect();
    let lower: Vec<&str> = controller.filter("alice").iter().map(|g| g.id.as_str()).collect();
    assert_eq!(upper, vec!["g-1"]);
    assert_eq!(upper, lower);
    assert_eq!(controller.filter("").len(), 3);
    assert!(controller.filter("nobody").is_empty());
}

#[tokio::test]
async fn test_pagination_and_search_reset() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/getDetailsof/guests", many_guests_json(14)).await;
    let mut controller = guests(&ctx, 6);
    controller.load().await.unwrap();

    assert_eq!(controller.total_pages(), 3);
    assert_eq!(controller.page_items().len(), 6);
    assert!(controller.go_to_page(3));
    assert_eq!(controller.page_items().len(), 2);
    assert!(!controller.next_page());
    assert!(!controller.go_to_page(0));
    assert!(!controller.go_to_page(4));
    assert_eq!(controller.page(), 3);

    controller.set_search("guest 1");
    assert_eq!(controller.page(), 1);
    // Guest 1, Guest 10..14
    assert_eq!(controller.filtered().len(), 6);
    assert_eq!(controller.total_pages(), 1);
}

#[tokio::test]
async fn test_failed_load_keeps_items_and_sets_banner() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/reviews", reviews_json()).await;
    let api: Arc<dyn ResourceApi<Review>> = api(&ctx);
    let mut controller = ListController::new(api);
    controller.load().await.unwrap();
    assert_eq!(controller.items().len(), 2);
    assert!(controller.banner().is_none());

    ctx.api_mock.reset().await;
    ctx.api_mock.mock_status("GET", "/reviews", 503, json!({})).await;
    assert!(controller.load().await.is_err());
    assert_eq!(controller.items().len(), 2);
    assert!(controller.banner().is_some());
    assert_eq!(controller.load_status(), LoadStatus::Failed);
}

#[tokio::test]
async fn test_view_refetches_record() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/reviews", reviews_json()).await;
    ctx.api_mock
        .mock_status(
            "GET",
            "/reviews/rv-2",
            200,
            json!({ "_id": "rv-2", "name": "Bina", "rating": 3, "comment": "Edited", "createdAt": "2024-02-03" }),
        )
        .await;
    let api: Arc<dyn ResourceApi<Review>> = api(&ctx);
    let mut controller = ListController::new(api);
    controller.load().await.unwrap();

    controller.view("rv-2").await.unwrap();
    assert_matches!(controller.mode(), ViewMode::Viewing(review) if review.comment == "Edited" && review.rating == 3);

    controller.back().unwrap();
    assert!(controller.view("rv-404").await.is_err());
    assert!(controller.mode().is_listing());
    assert!(controller.banner().is_some());
}

#[tokio::test]
async fn test_delete_removes_locally_without_reload() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/reviews", reviews_json()).await;
    ctx.api_mock.mock_status("DELETE", "/reviews/rv-1", 200, json!({ "ok": true })).await;
    let api: Arc<dyn ResourceApi<Review>> = api(&ctx);
    let mut controller = ListController::new(api);
    controller.load().await.unwrap();

    controller.delete("rv-1").await.unwrap();
    assert_eq!(controller.items().iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["rv-2"]);
    assert_eq!(ctx.api_mock.count_requests("GET", "/reviews").await, 1);
}
