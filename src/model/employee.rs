use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "name": "Alice",
        "department": "Eng",
        "salary": 90000.0,
        "isActive": true,
        "createdAt": "2026-01-01T09:00:00Z",
        "updatedAt": null
    })
)]
pub struct Employee {
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

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub updated_at: Option<DateTime<Utc>>,
}
