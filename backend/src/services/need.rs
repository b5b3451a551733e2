//! Need (volunteer opportunity) service

use std::collections::HashMap;

use serde::Deserialize;
use shared::{
    validation::{validate_not_blank, validate_phone},
    ListParams, Need, NeedFormat, Volunteer, VolunteerNeedMatch,
};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::services::volunteer_match::MatchService;

/// Need service for managing volunteer opportunities
#[derive(Clone)]
pub struct NeedService {
    db: PgPool,
}

/// Input for creating or fully replacing a need
#[derive(Debug, Deserialize, Validate)]
pub struct NeedInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub title: String,
    #[validate(custom = "validate_not_blank")]
    pub description: String,
    pub required_tasks: Option<String>,
    pub required_skills: Option<String>,
    #[validate(range(min = 1, message = "At least one volunteer must be needed"))]
    pub num_volunteers_needed: i32,
    pub format: NeedFormat,
    pub location_details: Option<String>,
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub contact_name: String,
    #[validate(email(message = "Invalid email format"), length(max = 255))]
    pub contact_email: String,
    #[validate(length(max = 50), custom = "validate_phone")]
    pub contact_phone: Option<String>,
    pub owner_id: i64,
}

impl NeedService {
    /// Create a new NeedService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a page of needs ordered by ID, each with its owner attached
    pub async fn get_needs(&self, params: ListParams) -> AppResult<Vec<Need>> {
        let needs = sqlx::query_as::<_, Need>(
            r#"
            SELECT id, title, description, required_tasks, required_skills,
                   num_volunteers_needed, format, location_details,
                   contact_name, contact_email, contact_phone, owner_id
            FROM needs
            ORDER BY id ASC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(params.offset())
        .bind(params.effective_limit())
        .fetch_all(&self.db)
        .await?;

        let mut owner_ids: Vec<i64> = needs.iter().map(|n| n.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        // One query for all owners on the page
        let owners: HashMap<i64, Volunteer> = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, phone, about_me, skills, volunteer_interests,
                   location, availability, is_active, is_manager
            FROM volunteers
            WHERE id = ANY($1)
            "#,
        )
        .bind(&owner_ids)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();

        needs
            .into_iter()
            .map(|need| {
                let owner = owners.get(&need.owner_id).cloned().ok_or_else(|| {
                    AppError::Internal(format!("Owner of need {} is missing", need.id))
                })?;
                Ok(need.with_owner(owner))
            })
            .collect()
    }

    /// Get a need by ID with its owner
    pub async fn get_need(&self, need_id: i64) -> AppResult<Need> {
        let need = sqlx::query_as::<_, Need>(
            r#"
            SELECT id, title, description, required_tasks, required_skills,
                   num_volunteers_needed, format, location_details,
                   contact_name, contact_email, contact_phone, owner_id
            FROM needs
            WHERE id = $1
            "#,
        )
        .bind(need_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Need".to_string()))?;

        self.attach_owner(need).await
    }

    /// Create a new need
    pub async fn create_need(&self, input: NeedInput) -> AppResult<Need> {
        self.ensure_owner_exists(input.owner_id).await?;

        let need = sqlx::query_as::<_, Need>(
            r#"
            INSERT INTO needs (title, description, required_tasks, required_skills,
                               num_volunteers_needed, format, location_details,
                               contact_name, contact_email, contact_phone, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, title, description, required_tasks, required_skills,
                      num_volunteers_needed, format, location_details,
                      contact_name, contact_email, contact_phone, owner_id
            "#,
        )
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(&input.required_tasks)
        .bind(&input.required_skills)
        .bind(input.num_volunteers_needed)
        .bind(input.format)
        .bind(&input.location_details)
        .bind(input.contact_name.trim())
        .bind(input.contact_email.trim())
        .bind(&input.contact_phone)
        .bind(input.owner_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| owner_write_error(input.owner_id, e))?;

        tracing::info!(need_id = need.id, owner_id = need.owner_id, "Need created");

        self.attach_owner(need).await
    }

    /// Replace a need's fields
    pub async fn update_need(&self, need_id: i64, input: NeedInput) -> AppResult<Need> {
        self.ensure_need_exists(need_id).await?;
        self.ensure_owner_exists(input.owner_id).await?;

        let need = sqlx::query_as::<_, Need>(
            r#"
            UPDATE needs SET
                title = $2,
                description = $3,
                required_tasks = $4,
                required_skills = $5,
                num_volunteers_needed = $6,
                format = $7,
                location_details = $8,
                contact_name = $9,
                contact_email = $10,
                contact_phone = $11,
                owner_id = $12
            WHERE id = $1
            RETURNING id, title, description, required_tasks, required_skills,
                      num_volunteers_needed, format, location_details,
                      contact_name, contact_email, contact_phone, owner_id
            "#,
        )
        .bind(need_id)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(&input.required_tasks)
        .bind(&input.required_skills)
        .bind(input.num_volunteers_needed)
        .bind(input.format)
        .bind(&input.location_details)
        .bind(input.contact_name.trim())
        .bind(input.contact_email.trim())
        .bind(&input.contact_phone)
        .bind(input.owner_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| owner_write_error(input.owner_id, e))?
        .ok_or_else(|| AppError::NotFound("Need".to_string()))?;

        tracing::info!(need_id, "Need updated");

        self.attach_owner(need).await
    }

    /// Delete a need together with its matches
    pub async fn delete_need(&self, need_id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Holding the row lock keeps new matches out until commit
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT id FROM needs WHERE id = $1 FOR UPDATE")
                .bind(need_id)
                .fetch_optional(&mut *tx)
                .await?;

        if exists.is_none() {
            return Err(AppError::NotFound("Need".to_string()));
        }

        let removed_matches = MatchService::delete_for_need(&mut *tx, need_id).await?;

        sqlx::query("DELETE FROM needs WHERE id = $1")
            .bind(need_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(need_id, removed_matches, "Need deleted");

        Ok(())
    }

    /// Matches recorded for a need
    pub async fn get_matches(&self, need_id: i64) -> AppResult<Vec<VolunteerNeedMatch>> {
        self.ensure_need_exists(need_id).await?;

        MatchService::new(self.db.clone()).list_for_need(need_id).await
    }

    /// Remove every match recorded for a need
    pub async fn clear_matches(&self, need_id: i64) -> AppResult<u64> {
        self.ensure_need_exists(need_id).await?;

        let mut conn = self.db.acquire().await?;
        let removed = MatchService::delete_for_need(&mut *conn, need_id).await?;

        tracing::info!(need_id, removed, "Need matches cleared");

        Ok(removed)
    }

    async fn ensure_need_exists(&self, need_id: i64) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM needs WHERE id = $1)")
            .bind(need_id)
            .fetch_one(&self.db)
            .await?;

        if !exists {
            return Err(AppError::NotFound("Need".to_string()));
        }
        Ok(())
    }

    async fn ensure_owner_exists(&self, owner_id: i64) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM volunteers WHERE id = $1)")
                .bind(owner_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::validation(
                "owner_id",
                format!("Volunteer {} does not exist", owner_id),
            ));
        }
        Ok(())
    }

    async fn attach_owner(&self, need: Need) -> AppResult<Need> {
        let owner = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, phone, about_me, skills, volunteer_interests,
                   location, availability, is_active, is_manager
            FROM volunteers
            WHERE id = $1
            "#,
        )
        .bind(need.owner_id)
        .fetch_one(&self.db)
        .await?;

        Ok(need.with_owner(owner))
    }
}

/// The only foreign key on `needs` is the owner, so a violation means the
/// owner disappeared after it was checked
fn owner_write_error(owner_id: i64, err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::validation("owner_id", format!("Volunteer {} does not exist", owner_id))
    } else {
        AppError::DatabaseError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NeedInput {
        NeedInput {
            title: "Food bank sorting".to_string(),
            description: "Sort donated cans on Saturday mornings".to_string(),
            required_tasks: Some("Sorting, labelling".to_string()),
            required_skills: None,
            num_volunteers_needed: 4,
            format: NeedFormat::InPerson,
            location_details: Some("Warehouse B".to_string()),
            contact_name: "Jo".to_string(),
            contact_email: "jo@foodbank.org".to_string(),
            contact_phone: None,
            owner_id: 1,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_zero_volunteers_rejected() {
        let need = NeedInput {
            num_volunteers_needed: 0,
            ..input()
        };
        let errors = need.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("num_volunteers_needed"));
    }

    #[test]
    fn test_long_title_rejected() {
        let need = NeedInput {
            title: "x".repeat(256),
            ..input()
        };
        assert!(need.validate().is_err());
    }

    #[test]
    fn test_unknown_format_fails_to_deserialize() {
        let body = serde_json::json!({
            "title": "Tutoring",
            "description": "Math help",
            "num_volunteers_needed": 2,
            "format": "hybrid",
            "contact_name": "Jo",
            "contact_email": "jo@example.org",
            "owner_id": 1
        });
        assert!(serde_json::from_value::<NeedInput>(body).is_err());
    }
}
