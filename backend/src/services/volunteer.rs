//! Volunteer profile service

use serde::Deserialize;
use shared::{
    validation::{validate_not_blank, validate_password, validate_phone},
    ListParams, Volunteer, VolunteerNeedMatch,
};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::services::volunteer_match::MatchService;

/// Volunteer service for managing volunteer profiles
#[derive(Clone)]
pub struct VolunteerService {
    db: PgPool,
}

/// Input for creating a volunteer
#[derive(Deserialize, Validate)]
pub struct CreateVolunteerInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    #[validate(email(message = "Invalid email format"), length(max = 255))]
    pub email: String,
    #[validate(custom = "validate_password")]
    pub password: String,
    #[validate(length(max = 50), custom = "validate_phone")]
    pub phone: Option<String>,
    pub about_me: Option<String>,
    pub skills: Option<String>,
    pub volunteer_interests: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 255))]
    pub availability: Option<String>,
}

/// Input for updating a volunteer; replaces every profile field and
/// re-hashes the password only when one is supplied
#[derive(Deserialize, Validate)]
pub struct UpdateVolunteerInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    #[validate(email(message = "Invalid email format"), length(max = 255))]
    pub email: String,
    #[validate(custom = "validate_password")]
    pub password: Option<String>,
    #[validate(length(max = 50), custom = "validate_phone")]
    pub phone: Option<String>,
    pub about_me: Option<String>,
    pub skills: Option<String>,
    pub volunteer_interests: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 255))]
    pub availability: Option<String>,
}

impl std::fmt::Debug for CreateVolunteerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateVolunteerInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for UpdateVolunteerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateVolunteerInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Emails are compared case-insensitively, so they are stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password with bcrypt off the async runtime
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

impl VolunteerService {
    /// Create a new VolunteerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a page of volunteers ordered by ID
    pub async fn get_volunteers(&self, params: ListParams) -> AppResult<Vec<Volunteer>> {
        let volunteers = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, phone, about_me, skills, volunteer_interests,
                   location, availability, is_active, is_manager
            FROM volunteers
            ORDER BY id ASC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(params.offset())
        .bind(params.effective_limit())
        .fetch_all(&self.db)
        .await?;

        Ok(volunteers)
    }

    /// Get a volunteer by ID
    pub async fn get_volunteer(&self, volunteer_id: i64) -> AppResult<Volunteer> {
        sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, phone, about_me, skills, volunteer_interests,
                   location, availability, is_active, is_manager
            FROM volunteers
            WHERE id = $1
            "#,
        )
        .bind(volunteer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Volunteer".to_string()))
    }

    /// Find a volunteer by email
    pub async fn get_volunteer_by_email(&self, email: &str) -> AppResult<Option<Volunteer>> {
        let volunteer = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, phone, about_me, skills, volunteer_interests,
                   location, availability, is_active, is_manager
            FROM volunteers
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.db)
        .await?;

        Ok(volunteer)
    }

    /// Create a new volunteer
    pub async fn create_volunteer(&self, input: CreateVolunteerInput) -> AppResult<Volunteer> {
        let email = normalize_email(&input.email);

        if self.get_volunteer_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash_password(input.password).await?;

        let volunteer = sqlx::query_as::<_, Volunteer>(
            r#"
            INSERT INTO volunteers (name, email, password, phone, about_me, skills,
                                    volunteer_interests, location, availability)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, email, phone, about_me, skills, volunteer_interests,
                      location, availability, is_active, is_manager
            "#,
        )
        .bind(input.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(&input.phone)
        .bind(&input.about_me)
        .bind(&input.skills)
        .bind(&input.volunteer_interests)
        .bind(&input.location)
        .bind(&input.availability)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration
            if is_unique_violation(&e) {
                AppError::DuplicateEntry("email".to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        tracing::info!(volunteer_id = volunteer.id, "Volunteer created");

        Ok(volunteer)
    }

    /// Update a volunteer profile
    pub async fn update_volunteer(
        &self,
        volunteer_id: i64,
        input: UpdateVolunteerInput,
    ) -> AppResult<Volunteer> {
        // Check if volunteer exists
        self.get_volunteer(volunteer_id).await?;

        let email = normalize_email(&input.email);

        // Check for duplicate email
        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM volunteers WHERE email = $1 AND id != $2",
        )
        .bind(&email)
        .bind(volunteer_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = match input.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let volunteer = sqlx::query_as::<_, Volunteer>(
            r#"
            UPDATE volunteers SET
                name = $2,
                email = $3,
                password = COALESCE($4, password),
                phone = $5,
                about_me = $6,
                skills = $7,
                volunteer_interests = $8,
                location = $9,
                availability = $10
            WHERE id = $1
            RETURNING id, name, email, phone, about_me, skills, volunteer_interests,
                      location, availability, is_active, is_manager
            "#,
        )
        .bind(volunteer_id)
        .bind(input.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(&input.phone)
        .bind(&input.about_me)
        .bind(&input.skills)
        .bind(&input.volunteer_interests)
        .bind(&input.location)
        .bind(&input.availability)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateEntry("email".to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound("Volunteer".to_string()))?;

        tracing::info!(volunteer_id, "Volunteer updated");

        Ok(volunteer)
    }

    /// Delete a volunteer together with their matches
    pub async fn delete_volunteer(&self, volunteer_id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM volunteers WHERE id = $1 FOR UPDATE",
        )
        .bind(volunteer_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            return Err(AppError::NotFound("Volunteer".to_string()));
        }

        let owned_needs =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM needs WHERE owner_id = $1")
                .bind(volunteer_id)
                .fetch_one(&mut *tx)
                .await?;

        if owned_needs > 0 {
            return Err(AppError::Conflict {
                resource: "volunteer".to_string(),
                message: format!(
                    "Volunteer still owns {} need(s); delete or reassign them first",
                    owned_needs
                ),
            });
        }

        let removed_matches = MatchService::delete_for_volunteer(&mut *tx, volunteer_id).await?;

        sqlx::query("DELETE FROM volunteers WHERE id = $1")
            .bind(volunteer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(volunteer_id, removed_matches, "Volunteer deleted");

        Ok(())
    }

    /// Matches recorded for a volunteer
    pub async fn get_matches(&self, volunteer_id: i64) -> AppResult<Vec<VolunteerNeedMatch>> {
        self.get_volunteer(volunteer_id).await?;

        MatchService::new(self.db.clone())
            .list_for_volunteer(volunteer_id)
            .await
    }
}
