use actix_web::{HttpResponse, http::header, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    model::employee::Employee,
    repo::employee::{EmployeeFilter, EmployeeRepository, NewEmployee},
};

const SALARY_MAX: f64 = 1_000_000.0;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "Eng")]
    pub department: String,
    #[schema(example = 90000.0)]
    pub salary: f64,
    #[schema(example = true)]
    pub is_active: bool,
}

impl From<&Employee> for EmployeeDto {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            department: e.department.clone(),
            salary: e.salary,
            is_active: e.is_active,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeDto {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "Eng")]
    pub department: String,
    #[schema(example = 90000.0, minimum = 0, maximum = 1000000)]
    pub salary: f64,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "Eng")]
    pub department: String,
    #[schema(example = 95000.0, minimum = 0, maximum = 1000000)]
    pub salary: f64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    /// Equality filter on department.
    pub department: Option<String>,
    /// Equality filter on the active flag.
    pub is_active: Option<bool>,
    /// "name" or "salary"; anything else sorts by id.
    pub sort_by: Option<String>,
}

impl From<EmployeeQuery> for EmployeeFilter {
    fn from(q: EmployeeQuery) -> Self {
        Self {
            department: q.department,
            is_active: q.is_active,
            sort_by: q.sort_by,
        }
    }
}

fn validate(name: &str, department: &str, salary: f64) -> Result<(), ApiError> {
    if name.trim().is_empty() || department.trim().is_empty() {
        return Err(ApiError::Validation(
            "Name and department must not be empty".to_string(),
        ));
    }
    if !(0.0..=SALARY_MAX).contains(&salary) {
        return Err(ApiError::Validation(format!(
            "Salary must be between 0 and {SALARY_MAX}"
        )));
    }
    Ok(())
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employee list", body = [EmployeeDto]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    repo: web::Data<EmployeeRepository>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = EmployeeFilter::from(query.into_inner());
    let employees = repo.get_all(&filter).await?;
    let dtos: Vec<EmployeeDto> = employees.iter().map(EmployeeDto::from).collect();
    Ok(HttpResponse::Ok().json(dtos))
}

/// Get employee by id
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDto),
        (status = 404, description = "Employee absent or inactive")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    repo: web::Data<EmployeeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let employee = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;
    Ok(HttpResponse::Ok().json(EmployeeDto::from(&employee)))
}

/// Create employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = EmployeeDto,
            headers(("Location" = String, description = "URL of the new employee"))),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Duplicate name within department")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    repo: web::Data<EmployeeRepository>,
    body: web::Json<CreateEmployeeDto>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    validate(&body.name, &body.department, body.salary)?;

    let employee = repo
        .add(NewEmployee {
            name: body.name,
            department: body.department,
            salary: body.salary,
        })
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/employees/{}", employee.id)))
        .json(EmployeeDto::from(&employee)))
}

/// Update employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee ID")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 204, description = "Employee updated"),
        (status = 400, description = "ID mismatch or validation failure"),
        (status = 404, description = "Employee absent or inactive"),
        (status = 409, description = "Duplicate name within department")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    repo: web::Data<EmployeeRepository>,
    path: web::Path<i64>,
    body: web::Json<UpdateEmployeeDto>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let body = body.into_inner();

    if id != body.id {
        return Err(ApiError::Validation("ID mismatch".to_string()));
    }
    validate(&body.name, &body.department, body.salary)?;

    let existing = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let updated = Employee {
        name: body.name,
        department: body.department,
        salary: body.salary,
        ..existing
    };
    repo.update(&updated).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Soft-delete employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deactivated"),
        (status = 404, description = "Employee absent or inactive")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    repo: web::Data<EmployeeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    repo.soft_delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Average salary per department
#[utoipa::path(
    get,
    path = "/api/employees/departments/{department}/average-salary",
    params(("department" = String, Path, description = "Department name")),
    responses(
        (status = 200, description = "Mean salary over active employees", body = f64),
        (status = 404, description = "No active employees in department")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn average_salary(
    repo: web::Data<EmployeeRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let department = path.into_inner();
    let average = repo
        .average_salary(&department)
        .await?
        .ok_or_else(|| ApiError::NotFound("Department not found".to_string()))?;
    Ok(HttpResponse::Ok().json(average))
}
