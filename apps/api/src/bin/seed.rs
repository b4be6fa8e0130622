//! Development seed: wipes all data and creates the demo "Customer
//! Feedback" form at slug `demo` with a small question bank and a valid
//! grid layout.
//!
//! Run with: `cargo run --bin seed`

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").context("Required environment variable 'DATABASE_URL' is not set")?;

    let db = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    println!("Seeding…");

    // Clean for dev, respecting FK order.
    for table in ["answers", "responses", "form_cells", "options", "questions", "forms"] {
        sqlx::query(&format!("DELETE FROM {table}")).execute(&db).await?;
    }

    let form_id: Uuid = sqlx::query_scalar(
        "INSERT INTO forms (slug, title, description) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("demo")
    .bind("Customer Feedback")
    .bind("Tell us about your experience.")
    .fetch_one(&db)
    .await?;

    let name = create_question(&db, "Your Name", "text", true).await?;
    let email = create_question(&db, "Email", "text", false).await?;

    let satisfaction = create_question(&db, "How satisfied are you?", "radio", true).await?;
    create_options(
        &db,
        satisfaction,
        &[
            ("Very satisfied", "5"),
            ("Satisfied", "4"),
            ("Neutral", "3"),
            ("Dissatisfied", "2"),
            ("Very dissatisfied", "1"),
        ],
    )
    .await?;

    let topics = create_question(&db, "Topics you care about", "checkbox", false).await?;
    create_options(
        &db,
        topics,
        &[("Speed", "speed"), ("Design", "design"), ("Features", "features")],
    )
    .await?;

    let comments = create_question(&db, "Anything else?", "textarea", false).await?;
    let visit_date = create_question(&db, "Visit date", "date", false).await?;

    // Layout plan:
    // Row 1: Name (6) | Email (6)
    // Row 2: Satisfaction (12)
    // Row 3: Topics (12)
    // Row 4: Anything else (12)
    // Row 5: Visit date (12)
    let cells: &[(Uuid, i32, i32, i32)] = &[
        (name, 1, 1, 6),
        (email, 1, 2, 6),
        (satisfaction, 2, 1, 12),
        (topics, 3, 1, 12),
        (comments, 4, 1, 12),
        (visit_date, 5, 1, 12),
    ];

    for (ord, (qid, row, col, span)) in cells.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO form_cells (form_id, question_id, grid_row, grid_col, span, ord)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(form_id)
        .bind(qid)
        .bind(row)
        .bind(col)
        .bind(span)
        .bind(ord as i32)
        .execute(&db)
        .await?;
    }

    println!("Seeded form at /api/forms/demo");
    println!("Done.");
    Ok(())
}

async fn create_question(db: &PgPool, label: &str, qtype: &str, required: bool) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO questions (label, qtype, required) VALUES ($1, $2::question_type, $3) RETURNING id",
    )
    .bind(label)
    .bind(qtype)
    .bind(required)
    .fetch_one(db)
    .await?;
    Ok(id)
}

async fn create_options(db: &PgPool, question_id: Uuid, pairs: &[(&str, &str)]) -> Result<()> {
    for (label, value) in pairs {
        sqlx::query("INSERT INTO options (question_id, label, value) VALUES ($1, $2, $3)")
            .bind(question_id)
            .bind(label)
            .bind(value)
            .execute(db)
            .await?;
    }
    Ok(())
}
