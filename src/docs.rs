use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::employee::{CreateEmployeeDto, EmployeeDto, UpdateEmployeeDto};
use crate::auth::handlers::{LoginRequest, LoginResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee System API",
        version = "1.0.0",
        description = r#"
## Employee System

CRUD API for employee records with soft delete, active-only name uniqueness
per department, and a per-department average-salary aggregate.

### Security
All `/api/employees` endpoints require **JWT Bearer authentication**; obtain a
token from `POST /api/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::average_salary,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            CreateEmployeeDto,
            UpdateEmployeeDto,
            EmployeeDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token issuance"),
        (name = "Employees", description = "Employee management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
