//! Slug derivation for form URLs: lowercase, alphanumeric runs joined by
//! single dashes, de-duplicated against existing forms with `-2`, `-3`, ...

use sqlx::PgPool;
use uuid::Uuid;

/// Lowercases the input and collapses every non-alphanumeric run into a
/// single dash, trimming leading/trailing dashes.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Finds the first free slug among `base`, `base-2`, `base-3`, ...
/// An empty base falls back to `form`.
pub async fn unique_slug(db: &PgPool, base: &str) -> Result<String, sqlx::Error> {
    let base = if base.is_empty() { "form" } else { base };
    let mut candidate = base.to_string();
    let mut i = 1;
    loop {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM forms WHERE slug = $1")
            .bind(&candidate)
            .fetch_optional(db)
            .await?;
        if exists.is_none() {
            return Ok(candidate);
        }
        i += 1;
        candidate = format!("{base}-{i}");
    }
}
