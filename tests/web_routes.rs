use actix_web::{test, web, App};
use serde_json::{json, Value};
use timetable_viewer::client::GenerationClient;
use timetable_viewer::config::ViewerConfig;
use timetable_viewer::schedule::Assignment;
use timetable_viewer::web::{configure, AppState};

fn state() -> web::Data<AppState> {
    let client = GenerationClient::new(&ViewerConfig::default()).expect("http client");
    web::Data::new(AppState::new(client))
}

const SAVED: &str = r#"{
  "students": {"Alice": {"lessons": [{"name": "Math", "type": "対面", "count": 2}], "unavailable_dates": []}},
  "schedule_info": {"dates": ["2025-01-01"], "slots_per_day": ["AM", "PM"]}
}"#;

#[actix_web::test]
async fn form_actions_edit_the_session_form() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/form/action")
        .set_json(json!({"action": "add_person"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let person = body["created"].as_u64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/form/action")
        .set_json(json!({"action": "set_person_name", "person": person, "value": "Alice"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["form"]["people"][0]["name"], "Alice");

    let req = test::TestRequest::post()
        .uri("/api/form/action")
        .set_json(json!({"action": "remove_person", "person": 999}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn import_rejects_documents_without_required_keys() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/import")
        .set_payload(r#"{"students": {}}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = test::TestRequest::get().uri("/api/form").to_request();
    let form: Value = test::call_and_read_body_json(&app, req).await;
    assert!(form["people"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn import_then_save_returns_the_document() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    let req = test::TestRequest::post().uri("/import").set_payload(SAVED).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::get().uri("/export/schedule_data.json").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        "attachment; filename=\"schedule_data.json\""
    );
    let saved: Value = test::read_body_json(resp).await;
    let original: Value = serde_json::from_str(SAVED).unwrap();
    assert_eq!(saved, original);
}

#[actix_web::test]
async fn csv_export_waits_for_a_timetable() {
    let state = state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/export/schedule.csv").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    {
        let mut session = state.session.lock().unwrap();
        session.load_json(SAVED).unwrap();
        session.begin_generation().unwrap();
        let mut grid = timetable_viewer::schedule::AssignmentGrid::new();
        grid.entry("2025-01-01".into())
            .or_default()
            .insert("PM".into(), vec![Assignment::new("Alice", "Math_1", "対面")]);
        session.finish_generation(Ok(grid));
    }

    let req = test::TestRequest::get().uri("/export/schedule.csv").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        "\u{FEFF}Date,AM,PM\n2025-01-01,\"\",\"Alice(Math)\""
    );
}

#[actix_web::test]
async fn filter_and_search_update_the_view() {
    let state = state();
    {
        let mut session = state.session.lock().unwrap();
        session.load_json(SAVED).unwrap();
        session.begin_generation().unwrap();
        let mut grid = timetable_viewer::schedule::AssignmentGrid::new();
        grid.entry("2025-01-01".into()).or_default().insert(
            "AM".into(),
            vec![
                Assignment::new("Alice", "Math_1", "対面"),
                Assignment::new("Bob", "Eng_1", "SS"),
            ],
        );
        session.finish_generation(Ok(grid));
    }
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/filter")
        .set_json(json!({"target": "Alice"}))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    let badges = &view["rows"][0]["cells"][0];
    assert_eq!(badges[0]["dimmed"], false);
    assert_eq!(badges[1]["dimmed"], true);

    let req = test::TestRequest::post()
        .uri("/api/search")
        .set_json(json!({"query": "bo"}))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    let visible: Vec<&str> = view["selector"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["visible"] == true)
        .map(|e| e["target"].as_str().unwrap())
        .collect();
    assert_eq!(visible, vec!["all", "Bob"]);
    assert_eq!(view["rows"][0]["cells"][0][1]["dimmed"], true);

    let req = test::TestRequest::get().uri("/").to_request();
    let page = test::call_and_read_body(&app, req).await;
    let page = std::str::from_utf8(&page).unwrap();
    assert!(page.contains("lesson-badge lesson-type-SS dimmed"));
    assert!(page.contains("href=\"/export/schedule.csv\""));
}
