//! Seed data
//!
//! Demo contents loaded by [`AppState::seeded`](crate::state::AppState::seeded).

use crate::auth::Role;
use crate::models::{
    ApiEndpoint, ApiKey, AppUser, Column, Database, EndpointCategory, HttpMethod, KeyStatus,
    Table, UserStatus,
};
use chrono::{DateTime, TimeZone, Utc};

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("seed timestamps are valid UTC instants")
}

pub fn databases() -> Vec<Database> {
    vec![Database {
        id: "1".to_string(),
        name: "E-commerce Platform".to_string(),
        owner: "admin".to_string(),
        created_at: timestamp(2024, 1, 15, 10, 30),
        description: Some("Main e-commerce database with users, products, and orders".to_string()),
        tables: vec![
            Table {
                id: "1-1".to_string(),
                name: "users".to_string(),
                created_at: timestamp(2024, 1, 15, 10, 30),
                columns: vec![
                    Column::new("id", "UUID").with_constraints("PRIMARY KEY"),
                    Column::new("email", "VARCHAR(255)").with_constraints("UNIQUE NOT NULL"),
                    Column::new("name", "VARCHAR(100)").with_nullable(false),
                    Column::new("created_at", "TIMESTAMP").with_default("NOW()"),
                ],
            },
            Table {
                id: "1-2".to_string(),
                name: "products".to_string(),
                created_at: timestamp(2024, 1, 15, 11, 0),
                columns: vec![
                    Column::new("id", "UUID").with_constraints("PRIMARY KEY"),
                    Column::new("name", "VARCHAR(200)").with_nullable(false),
                    Column::new("price", "DECIMAL(10,2)").with_nullable(false),
                    Column::new("description", "TEXT"),
                    Column::new("category_id", "UUID").with_constraints("FOREIGN KEY"),
                ],
            },
        ],
    }]
}

pub fn api_keys() -> Vec<ApiKey> {
    vec![
        ApiKey {
            id: "1".to_string(),
            name: "Production Key".to_string(),
            key: "zt_live_sk_1a2b3c4d5e6f7g8h9i0j".to_string(),
            created_at: timestamp(2024, 1, 10, 10, 0),
            last_used: Some(timestamp(2024, 1, 15, 14, 30)),
            status: KeyStatus::Active,
        },
        ApiKey {
            id: "2".to_string(),
            name: "Development Key".to_string(),
            key: "zt_test_sk_9i8h7g6f5e4d3c2b1a0z".to_string(),
            created_at: timestamp(2024, 1, 12, 15, 30),
            last_used: Some(timestamp(2024, 1, 14, 9, 15)),
            status: KeyStatus::Active,
        },
    ]
}

pub fn api_endpoints() -> Vec<ApiEndpoint> {
    let endpoint = |id: &str, method, url: &str, description: &str, category| ApiEndpoint {
        id: id.to_string(),
        method,
        url: url.to_string(),
        description: description.to_string(),
        category,
    };

    vec![
        endpoint("1", HttpMethod::Get, "/api/v1/databases", "List all databases", EndpointCategory::Database),
        endpoint("2", HttpMethod::Post, "/api/v1/databases", "Create new database", EndpointCategory::Database),
        endpoint("3", HttpMethod::Get, "/api/v1/databases/{id}/schema", "Get database schema", EndpointCategory::Database),
        endpoint("4", HttpMethod::Post, "/api/v1/auth/verify", "Verify API key", EndpointCategory::Auth),
        endpoint("5", HttpMethod::Get, "/api/v1/storage/files", "List storage files", EndpointCategory::Storage),
    ]
}

pub fn users() -> Vec<AppUser> {
    let user = |id: &str, first: &str, last: &str, username: &str, email: &str, role, created, login| AppUser {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        role,
        status: UserStatus::Active,
        created_at: created,
        last_login: Some(login),
    };

    vec![
        user(
            "admin",
            "Admin",
            "test",
            "usertest",
            "admin@zerotrust.dev",
            Role::Admin,
            timestamp(2024, 1, 1, 0, 0),
            timestamp(2024, 1, 15, 10, 30),
        ),
        user(
            "user1",
            "John",
            "Developer",
            "usertest01",
            "john@company.com",
            Role::User,
            timestamp(2024, 1, 10, 0, 0),
            timestamp(2024, 1, 14, 15, 20),
        ),
        user(
            "user2",
            "Sarah Designer",
            "Designer",
            "usertest02",
            "sarah@company.com",
            Role::User,
            timestamp(2024, 1, 12, 0, 0),
            timestamp(2024, 1, 13, 9, 45),
        ),
    ]
}
