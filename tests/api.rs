use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, http::StatusCode, test, web::Data};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;

use employee_api::{
    auth::jwt::{Claims, now},
    config::Config,
    db,
    repo::employee::EmployeeRepository,
    routes,
};

const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_issuer: "employee-api".to_string(),
        jwt_audience: "employee-api-clients".to_string(),
    }
}

async fn spawn_app() -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>
{
    // One connection so every request hits the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    let repository = EmployeeRepository::new(pool);

    test::init_service(
        App::new()
            .app_data(Data::new(repository))
            .app_data(Data::new(test_config()))
            .configure(routes::configure),
    )
    .await
}

async fn login<S>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "admin", "password": "admin123"}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

async fn create_employee<S>(app: &S, token: &str, name: &str, department: &str, salary: f64) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/employees")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"name": name, "department": department, "salary": salary}))
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "admin", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn employee_routes_require_a_valid_bearer_token() {
    let app = spawn_app().await;

    // No Authorization header.
    let req = test::TestRequest::get().uri("/api/employees").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme.
    let req = test::TestRequest::get()
        .uri("/api/employees")
        .insert_header(("Authorization", "Basic abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Token signed with a different key.
    let forged = encode(
        &Header::default(),
        &Claims {
            sub: "admin".to_string(),
            role: "Admin".to_string(),
            jti: "forged".to_string(),
            exp: now() + 3600,
            iss: "employee-api".to_string(),
            aud: "employee-api-clients".to_string(),
        },
        &EncodingKey::from_secret(b"ffffffffffffffffffffffffffffffff"),
    )
    .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/employees")
        .insert_header(("Authorization", format!("Bearer {forged}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let app = spawn_app().await;

    let expired = encode(
        &Header::default(),
        &Claims {
            sub: "admin".to_string(),
            role: "Admin".to_string(),
            jti: "expired".to_string(),
            exp: now() - 60,
            iss: "employee-api".to_string(),
            aud: "employee-api-clients".to_string(),
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/employees")
        .insert_header(("Authorization", format!("Bearer {expired}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn crud_scenario_end_to_end() {
    let app = spawn_app().await;
    let token = login(&app).await;

    // Create.
    let resp = create_employee(&app, &token, "Alice", "Eng", 90000.0).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "/api/employees/1"
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"id": 1, "name": "Alice", "department": "Eng", "salary": 90000.0, "isActive": true})
    );

    // Read back.
    let req = test::TestRequest::get()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["isActive"], true);

    // Soft delete.
    let req = test::TestRequest::delete()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone.
    let req = test::TestRequest::get()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Delete again is 404 too.
    let req = test::TestRequest::delete()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_replaces_fields_and_enforces_id_match() {
    let app = spawn_app().await;
    let token = login(&app).await;
    create_employee(&app, &token, "Alice", "Eng", 90000.0).await;

    // Path id must equal body id.
    let req = test::TestRequest::put()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"id": 2, "name": "Alice", "department": "Eng", "salary": 95000.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown id.
    let req = test::TestRequest::put()
        .uri("/api/employees/99")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"id": 99, "name": "Ghost", "department": "Eng", "salary": 1.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Valid update.
    let req = test::TestRequest::put()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"id": 1, "name": "Alice", "department": "Eng", "salary": 95000.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["salary"], json!(95000.0));
}

#[actix_web::test]
async fn create_rejects_out_of_range_salary_and_blank_fields() {
    let app = spawn_app().await;
    let token = login(&app).await;

    let resp = create_employee(&app, &token, "Alice", "Eng", -1.0).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = create_employee(&app, &token, "Alice", "Eng", 1_000_001.0).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = create_employee(&app, &token, "", "Eng", 50000.0).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn duplicate_create_conflicts_until_soft_deleted() {
    let app = spawn_app().await;
    let token = login(&app).await;

    let resp = create_employee(&app, &token, "Alice", "Eng", 90000.0).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = create_employee(&app, &token, "Alice", "Eng", 50000.0).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Same name, different department is allowed.
    let resp = create_employee(&app, &token, "Alice", "Sales", 50000.0).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Soft delete frees the (name, department) pair.
    let req = test::TestRequest::delete()
        .uri("/api/employees/1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = create_employee(&app, &token, "Alice", "Eng", 95000.0).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn list_supports_filters_and_sort_orders() {
    let app = spawn_app().await;
    let token = login(&app).await;
    create_employee(&app, &token, "Carol", "Eng", 70000.0).await;
    create_employee(&app, &token, "Alice", "Eng", 90000.0).await;
    create_employee(&app, &token, "Bob", "Sales", 60000.0).await;

    let get = |uri: &str| {
        test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request()
    };

    // Unrecognized sortBy falls back to ascending id.
    let resp = test::call_service(&app, get("/api/employees?sortBy=bogus")).await;
    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let resp = test::call_service(&app, get("/api/employees?sortBy=name")).await;
    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

    let resp = test::call_service(&app, get("/api/employees?sortBy=salary")).await;
    let body: Value = test::read_body_json(resp).await;
    let salaries: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["salary"].as_f64().unwrap())
        .collect();
    assert_eq!(salaries, vec![60000.0, 70000.0, 90000.0]);

    let resp = test::call_service(&app, get("/api/employees?department=Eng&isActive=true")).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn average_salary_is_mean_of_active_rows_or_404() {
    let app = spawn_app().await;
    let token = login(&app).await;
    create_employee(&app, &token, "Alice", "Eng", 90000.0).await;
    create_employee(&app, &token, "Bob", "Eng", 70000.0).await;

    let req = test::TestRequest::get()
        .uri("/api/employees/departments/Eng/average-salary")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!(80000.0));

    let req = test::TestRequest::get()
        .uri("/api/employees/departments/Nowhere/average-salary")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
