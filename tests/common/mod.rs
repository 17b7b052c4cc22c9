#![allow(dead_code)]

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

use payrun_be::Config;
use payrun_be::database::init_database;
use payrun_be::database::models::{
    CompensationType, EmployeeInput, EntryInput, LocationInput, Role, SubmissionInput, User,
};
use payrun_be::database::repositories::{
    AuditRepository, EmployeeRepository, LocationRepository, PaymentRepository,
    SubmissionRepository, UserRepository,
};
use payrun_be::payroll::PayrollGroup;
use payrun_be::services::{
    AuditLogger, AuthService, Claims, DraftService, PostingService, SubmissionService,
};

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        jwt_expiration_days: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
    }
}

/// Mints a token the same way AuthService does, without needing a user row.
pub fn test_token(config: &Config, role: Role, location_ids: Vec<Uuid>) -> String {
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "test@example.com".to_string(),
        role,
        location_ids,
        exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .expect("Failed to encode test token")
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub struct TestContext {
    pub pool: PgPool,
    pub config: Config,
    pub users: UserRepository,
    pub locations: LocationRepository,
    pub employees: EmployeeRepository,
    pub submissions: SubmissionRepository,
    pub audits: AuditRepository,
    pub payments: PaymentRepository,
    pub auth_service: AuthService,
    pub draft_service: DraftService,
    pub submission_service: SubmissionService,
    pub posting_service: PostingService,
}

impl TestContext {
    /// Connects to TEST_DATABASE_URL and starts from a clean slate. Returns
    /// None when the variable is not set so the suite stays green on
    /// machines without Postgres.
    pub async fn new() -> Result<Option<Self>> {
        let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
            return Ok(None);
        };

        let pool = init_database(&database_url).await?;

        sqlx::query(
            "TRUNCATE payments, approval_audits, submission_entries, payroll_submissions, \
             employees, user_locations, locations, users CASCADE",
        )
        .execute(&pool)
        .await?;

        let mut config = test_config();
        config.database_url = database_url;

        let users = UserRepository::new(pool.clone());
        let locations = LocationRepository::new(pool.clone());
        let employees = EmployeeRepository::new(pool.clone());
        let submissions = SubmissionRepository::new(pool.clone());
        let audits = AuditRepository::new(pool.clone());
        let payments = PaymentRepository::new(pool.clone());

        let auth_service = AuthService::new(users.clone(), config.clone());
        let audit_logger = AuditLogger::new(audits.clone());
        let draft_service = DraftService::new(employees.clone(), submissions.clone());
        let submission_service = SubmissionService::new(employees.clone(), submissions.clone());
        let posting_service = PostingService::new(
            submissions.clone(),
            employees.clone(),
            locations.clone(),
            payments.clone(),
            audit_logger,
        );

        Ok(Some(TestContext {
            pool,
            config,
            users,
            locations,
            employees,
            submissions,
            audits,
            payments,
            auth_service,
            draft_service,
            submission_service,
            posting_service,
        }))
    }

    pub async fn create_user(&self, email: &str, role: Role) -> Result<User> {
        // low bcrypt cost keeps the suite fast
        let password_hash = bcrypt::hash("password123", 4)?;
        self.users
            .create_user(email, &password_hash, "Test User", role)
            .await
    }

    pub async fn submission_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payroll_submissions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// Mock data builders
pub struct MockData;

impl MockData {
    /// Pay date on the group A anchor so mock employees in group A line up.
    pub fn pay_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
    }

    pub fn location() -> LocationInput {
        LocationInput {
            name: "Riverside Clinic".to_string(),
            organization_id: None,
        }
    }

    pub fn hourly_employee(location_id: Uuid, name: &str, rate: &str) -> EmployeeInput {
        EmployeeInput {
            location_id,
            name: name.to_string(),
            payroll_group: PayrollGroup::A,
            compensation_type: CompensationType::Hourly,
            hourly_rate: Some(rate.parse().unwrap()),
            piece_rate: None,
            fixed_pay: None,
        }
    }

    pub fn production_employee(location_id: Uuid, name: &str, piece_rate: &str) -> EmployeeInput {
        EmployeeInput {
            location_id,
            name: name.to_string(),
            payroll_group: PayrollGroup::A,
            compensation_type: CompensationType::Production,
            hourly_rate: None,
            piece_rate: Some(piece_rate.parse().unwrap()),
            fixed_pay: None,
        }
    }

    pub fn fixed_employee(location_id: Uuid, name: &str, fixed_pay: &str) -> EmployeeInput {
        EmployeeInput {
            location_id,
            name: name.to_string(),
            payroll_group: PayrollGroup::A,
            compensation_type: CompensationType::Fixed,
            hourly_rate: None,
            piece_rate: None,
            fixed_pay: Some(fixed_pay.parse().unwrap()),
        }
    }

    pub fn hours_entry(employee_id: Uuid, hours: &str) -> EntryInput {
        EntryInput {
            employee_id,
            hours: Some(hours.parse().unwrap()),
            units: None,
            pay_count: None,
            adjustment: None,
            notes: None,
        }
    }

    pub fn units_entry(employee_id: Uuid, units: &str) -> EntryInput {
        EntryInput {
            employee_id,
            hours: None,
            units: Some(units.parse().unwrap()),
            pay_count: None,
            adjustment: None,
            notes: None,
        }
    }

    pub fn fixed_entry(
        employee_id: Uuid,
        pay_count: Option<i32>,
        adjustment: Option<&str>,
    ) -> EntryInput {
        EntryInput {
            employee_id,
            hours: None,
            units: None,
            pay_count,
            adjustment: adjustment.map(|a| a.parse().unwrap()),
            notes: None,
        }
    }

    pub fn batch(location_id: Uuid, entries: Vec<EntryInput>) -> SubmissionInput {
        SubmissionInput {
            location_id,
            pay_date: Self::pay_date(),
            payroll_group: PayrollGroup::A,
            entries,
        }
    }
}
