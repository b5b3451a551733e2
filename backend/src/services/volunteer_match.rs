//! Volunteer/need match records
//!
//! Matches are stored links between a volunteer and a need with the
//! reasons they fit. Deleting either side removes its matches, so the
//! bulk deletes here take a connection and run inside the caller's
//! transaction.

use serde::Deserialize;
use shared::{validation::validate_not_blank, VolunteerNeedMatch};
use sqlx::{PgConnection, PgPool};
use validator::Validate;

use crate::error::{
    is_foreign_key_violation, is_unique_violation, violated_constraint, AppError, AppResult,
};

const VOLUNTEER_FKEY: &str = "volunteer_need_matches_volunteer_id_fkey";

/// Match service for recording volunteer/need fits
#[derive(Clone)]
pub struct MatchService {
    db: PgPool,
}

/// Input for recording a match
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatchInput {
    pub volunteer_id: i64,
    pub need_id: i64,
    #[validate(custom = "validate_not_blank")]
    pub match_details: String,
}

impl MatchService {
    /// Create a new MatchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a match between an existing volunteer and an existing need.
    /// A pair can be matched only once.
    pub async fn create_match(&self, input: CreateMatchInput) -> AppResult<VolunteerNeedMatch> {
        let volunteer_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM volunteers WHERE id = $1)")
                .bind(input.volunteer_id)
                .fetch_one(&self.db)
                .await?;
        if !volunteer_exists {
            return Err(AppError::NotFound("Volunteer".to_string()));
        }

        let need_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM needs WHERE id = $1)")
                .bind(input.need_id)
                .fetch_one(&self.db)
                .await?;
        if !need_exists {
            return Err(AppError::NotFound("Need".to_string()));
        }

        // The pair constraint and the foreign keys settle races with
        // concurrent matches and deletes
        let created = sqlx::query_as::<_, VolunteerNeedMatch>(
            r#"
            INSERT INTO volunteer_need_matches (volunteer_id, need_id, match_details, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, volunteer_id, need_id, match_details, created_at
            "#,
        )
        .bind(input.volunteer_id)
        .bind(input.need_id)
        .bind(input.match_details.trim())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict {
                    resource: "match".to_string(),
                    message: "This volunteer is already matched to this need".to_string(),
                }
            } else if is_foreign_key_violation(&e) {
                match violated_constraint(&e) {
                    Some(VOLUNTEER_FKEY) => AppError::NotFound("Volunteer".to_string()),
                    _ => AppError::NotFound("Need".to_string()),
                }
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        tracing::info!(
            match_id = created.id,
            volunteer_id = created.volunteer_id,
            need_id = created.need_id,
            "Match recorded"
        );

        Ok(created)
    }

    /// Get a match by ID
    pub async fn get_match(&self, match_id: i64) -> AppResult<VolunteerNeedMatch> {
        sqlx::query_as::<_, VolunteerNeedMatch>(
            r#"
            SELECT id, volunteer_id, need_id, match_details, created_at
            FROM volunteer_need_matches
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Match".to_string()))
    }

    /// Delete a single match
    pub async fn delete_match(&self, match_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM volunteer_need_matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Match".to_string()));
        }

        Ok(())
    }

    /// All matches for a volunteer
    pub async fn list_for_volunteer(&self, volunteer_id: i64) -> AppResult<Vec<VolunteerNeedMatch>> {
        let matches = sqlx::query_as::<_, VolunteerNeedMatch>(
            r#"
            SELECT id, volunteer_id, need_id, match_details, created_at
            FROM volunteer_need_matches
            WHERE volunteer_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(volunteer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(matches)
    }

    /// All matches for a need
    pub async fn list_for_need(&self, need_id: i64) -> AppResult<Vec<VolunteerNeedMatch>> {
        let matches = sqlx::query_as::<_, VolunteerNeedMatch>(
            r#"
            SELECT id, volunteer_id, need_id, match_details, created_at
            FROM volunteer_need_matches
            WHERE need_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(need_id)
        .fetch_all(&self.db)
        .await?;

        Ok(matches)
    }

    /// Delete every match of a need, returning how many were removed
    pub async fn delete_for_need(conn: &mut PgConnection, need_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM volunteer_need_matches WHERE need_id = $1")
            .bind(need_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every match of a volunteer, returning how many were removed
    pub async fn delete_for_volunteer(conn: &mut PgConnection, volunteer_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM volunteer_need_matches WHERE volunteer_id = $1")
            .bind(volunteer_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
