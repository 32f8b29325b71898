use crate::models::{
    AcademicMark, CatalogEntry, MarkInput, Program, ProgramRequirement, StudentPreferences,
    StudentProfile, University,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// PostgreSQL store for student data, the program catalog and liked courses
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Pool that only connects on first use; no migrations are run
    pub fn connect_lazy(database_url: &str) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Load a student's marks (in entry order) and preferences
    pub async fn load_profile(&self, student_id: i64) -> Result<StudentProfile, PostgresError> {
        let marks = self.get_marks(student_id).await?;
        let preferences = self.get_preferences(student_id).await?;

        tracing::debug!(
            "Loaded profile for student {}: {} marks, preferences: {}",
            student_id,
            marks.len(),
            preferences.is_some()
        );

        Ok(StudentProfile { marks, preferences })
    }

    pub async fn get_marks(&self, student_id: i64) -> Result<Vec<AcademicMark>, PostgresError> {
        let query = r#"
            SELECT subject_name, grade_or_percentage, grade_level
            FROM academic_mark
            WHERE student_id = $1
            ORDER BY mark_id
        "#;

        let rows = sqlx::query(query).bind(student_id).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| AcademicMark {
                subject_name: row.get("subject_name"),
                grade_or_percentage: row.get("grade_or_percentage"),
                grade_level: row.get("grade_level"),
            })
            .collect())
    }

    pub async fn get_preferences(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentPreferences>, PostgresError> {
        let query = r#"
            SELECT preferred_location, preferred_degrees, max_tuition_fee, study_mode,
                   relocate, focus_area, career_interests, financial_aid,
                   need_support, support_details
            FROM preference
            WHERE student_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| {
            let degrees: Json<Vec<String>> = row.get("preferred_degrees");
            let careers: Json<Vec<String>> = row.get("career_interests");
            StudentPreferences {
                location: row.get("preferred_location"),
                preferred_degrees: degrees.0,
                max_tuition_fee: row.get("max_tuition_fee"),
                study_mode: row.get("study_mode"),
                relocate: row.get("relocate"),
                focus_area: row.get("focus_area"),
                career_interests: careers.0,
                financial_aid: row.get("financial_aid"),
                need_support: row.get("need_support"),
                support_details: row.get("support_details"),
            }
        }))
    }

    /// Upsert marks by subject and replace the preference row
    ///
    /// Both writes happen in one transaction.
    pub async fn save_student_data(
        &self,
        student_id: i64,
        marks: &[MarkInput],
        preferences: Option<&StudentPreferences>,
    ) -> Result<(), PostgresError> {
        let mut tx = self.pool.begin().await?;

        let mark_query = r#"
            INSERT INTO academic_mark (student_id, subject_name, grade_or_percentage, grade_level)
            VALUES ($1, $2, $3, COALESCE($4, '12th Grade'))
            ON CONFLICT (student_id, subject_name)
            DO UPDATE SET
                grade_or_percentage = EXCLUDED.grade_or_percentage,
                grade_level = COALESCE($4, academic_mark.grade_level)
        "#;

        for mark in marks {
            sqlx::query(mark_query)
                .bind(student_id)
                .bind(&mark.subject_name)
                .bind(mark.grade_or_percentage)
                .bind(mark.grade_level.as_deref())
                .execute(&mut *tx)
                .await?;
        }

        if let Some(prefs) = preferences {
            let pref_query = r#"
                INSERT INTO preference (
                    student_id, preferred_location, preferred_degrees, max_tuition_fee,
                    study_mode, relocate, focus_area, career_interests, financial_aid,
                    need_support, support_details
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ON CONFLICT (student_id)
                DO UPDATE SET
                    preferred_location = EXCLUDED.preferred_location,
                    preferred_degrees = EXCLUDED.preferred_degrees,
                    max_tuition_fee = EXCLUDED.max_tuition_fee,
                    study_mode = EXCLUDED.study_mode,
                    relocate = EXCLUDED.relocate,
                    focus_area = EXCLUDED.focus_area,
                    career_interests = EXCLUDED.career_interests,
                    financial_aid = EXCLUDED.financial_aid,
                    need_support = EXCLUDED.need_support,
                    support_details = EXCLUDED.support_details
            "#;

            sqlx::query(pref_query)
                .bind(student_id)
                .bind(prefs.location.as_deref())
                .bind(Json(&prefs.preferred_degrees))
                .bind(prefs.max_tuition_fee)
                .bind(prefs.study_mode.as_deref())
                .bind(prefs.relocate)
                .bind(prefs.focus_area.as_deref())
                .bind(Json(&prefs.career_interests))
                .bind(prefs.financial_aid)
                .bind(prefs.need_support)
                .bind(prefs.support_details.as_deref())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Saved {} marks for student {} (preferences updated: {})",
            marks.len(),
            student_id,
            preferences.is_some()
        );

        Ok(())
    }

    /// Load every program with its university and requirements, ordered by id
    pub async fn load_catalog(&self) -> Result<Vec<CatalogEntry>, PostgresError> {
        let program_query = r#"
            SELECT p.program_id, p.program_name, p.description, p.degree_type,
                   p.duration_years, p.location, p.study_mode, p.fees,
                   u.university_id, u.name AS university_name, u.city, u.province_state
            FROM program p
            JOIN university u ON u.university_id = p.university_id
            ORDER BY p.program_id
        "#;

        let requirement_query = r#"
            SELECT program_id, required_subject, min_grade_percentage, is_prerequisite
            FROM requirement
            ORDER BY program_id, requirement_id
        "#;

        let program_rows = sqlx::query(program_query).fetch_all(&self.pool).await?;
        let requirement_rows = sqlx::query(requirement_query).fetch_all(&self.pool).await?;

        let mut requirements: HashMap<i64, Vec<ProgramRequirement>> = HashMap::new();
        for row in &requirement_rows {
            requirements
                .entry(row.get("program_id"))
                .or_default()
                .push(ProgramRequirement {
                    required_subject: row.get("required_subject"),
                    min_grade_percentage: row.get("min_grade_percentage"),
                    is_prerequisite: row.get("is_prerequisite"),
                });
        }

        let catalog: Vec<CatalogEntry> = program_rows
            .iter()
            .map(|row| {
                let program = program_from_row(row);
                CatalogEntry {
                    requirements: requirements.remove(&program.program_id).unwrap_or_default(),
                    university: University {
                        university_id: row.get("university_id"),
                        name: row.get("university_name"),
                        city: row.get("city"),
                        province_state: row.get("province_state"),
                    },
                    program,
                }
            })
            .collect();

        tracing::debug!("Loaded catalog with {} programs", catalog.len());

        Ok(catalog)
    }

    /// Program ids the student has liked
    pub async fn get_liked_courses(&self, student_id: i64) -> Result<Vec<i64>, PostgresError> {
        let query = r#"
            SELECT program_id
            FROM liked_course
            WHERE student_id = $1
            ORDER BY liked_at
        "#;

        let rows = sqlx::query(query).bind(student_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("program_id")).collect())
    }

    /// Like a course; returns `false` when it was already liked
    pub async fn save_liked_course(
        &self,
        student_id: i64,
        program_id: i64,
    ) -> Result<bool, PostgresError> {
        let exists = sqlx::query("SELECT 1 FROM program WHERE program_id = $1")
            .bind(program_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(PostgresError::NotFound(format!("program {}", program_id)));
        }

        let query = r#"
            INSERT INTO liked_course (student_id, program_id, liked_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (student_id, program_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(student_id)
            .bind(program_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a liked course; returns whether anything was deleted
    pub async fn remove_liked_course(
        &self,
        student_id: i64,
        program_id: i64,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM liked_course
            WHERE student_id = $1 AND program_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(student_id)
            .bind(program_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn program_from_row(row: &PgRow) -> Program {
    Program {
        program_id: row.get("program_id"),
        program_name: row.get("program_name"),
        description: row.get("description"),
        degree_type: row.get("degree_type"),
        duration_years: row.get("duration_years"),
        location: row.get("location"),
        study_mode: row.get("study_mode"),
        fees: row.get("fees"),
    }
}
