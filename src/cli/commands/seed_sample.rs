//! Sample data command handler
//!
//! Rows are written with explicit timestamps spread over the current month and
//! the two before it, so the admin overview has something to chart. Sample
//! courses are marked by a `[Sample]` title prefix and sample enrollments and
//! payments by `-SEED-` codes; a second run finds the markers and writes nothing.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::domain::{CourseStatus, EnrollmentStatus, PaymentStatus};
use crate::entities::{courses, enrollments, payments, prelude::*, teachers};

pub const SAMPLE_TITLE_PREFIX: &str = "[Sample]";
const SEED_ENROLLMENT_PREFIX: &str = "ENR-SEED-";
const SEED_PAYMENT_PREFIX: &str = "PAY-SEED-";

struct SampleCourse {
    title: &'static str,
    category: &'static str,
    price: f64,
    teacher: &'static str,
    months_back: u32,
}

const SAMPLE_COURSES: &[SampleCourse] = &[
    SampleCourse {
        title: "Rust for Backend Developers",
        category: "Programming",
        price: 199.0,
        teacher: "teacher1",
        months_back: 2,
    },
    SampleCourse {
        title: "Watercolor Basics",
        category: "Art",
        price: 79.0,
        teacher: "teacher2",
        months_back: 2,
    },
    SampleCourse {
        title: "SQL Fundamentals",
        category: "Data",
        price: 129.0,
        teacher: "teacher1",
        months_back: 1,
    },
    SampleCourse {
        title: "Public Speaking Workshop",
        category: "Business",
        price: 99.0,
        teacher: "teacher2",
        months_back: 1,
    },
    SampleCourse {
        title: "Async Programming in Practice",
        category: "Programming",
        price: 249.0,
        teacher: "teacher1",
        months_back: 0,
    },
    SampleCourse {
        title: "Portrait Photography",
        category: "Art",
        price: 149.0,
        teacher: "teacher2",
        months_back: 0,
    },
];

/// Rows written by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub courses: usize,
    pub enrollments: usize,
    pub payments: usize,
}

fn day_in_month(now: DateTime<Utc>, months_back: u32, day: u32) -> Result<String> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|d| d.checked_sub_months(Months::new(months_back)))
        .context("Sample month out of range")?;
    let date = first.with_day(day.min(now.day())).unwrap_or(first);
    let at = date
        .and_hms_opt(10, 0, 0)
        .context("Sample timestamp out of range")?;
    Ok(at.format("%Y-%m-%d %H:%M:%S").to_string())
}

async fn teacher_id(conn: &DatabaseConnection, username: &str) -> Result<i32> {
    Teachers::find()
        .filter(teachers::Column::Username.eq(username))
        .one(conn)
        .await
        .context("Failed to look up sample teacher")?
        .map(|t| t.id)
        .with_context(|| format!("Demo teacher '{username}' is missing"))
}

async fn seed_courses(
    conn: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<(courses::Model, u32)>> {
    let existing = Courses::find()
        .filter(courses::Column::Title.starts_with(SAMPLE_TITLE_PREFIX))
        .count(conn)
        .await
        .context("Failed to check for sample courses")?;
    if existing > 0 {
        return Ok(Vec::new());
    }

    let mut created = Vec::with_capacity(SAMPLE_COURSES.len());
    for (i, sample) in SAMPLE_COURSES.iter().enumerate() {
        let teacher_id = teacher_id(conn, sample.teacher).await?;
        let day = u32::try_from(i % 2).unwrap_or(0) * 10 + 1;
        let model = courses::ActiveModel {
            id: NotSet,
            title: Set(format!("{SAMPLE_TITLE_PREFIX} {}", sample.title)),
            description: Set(format!("An introductory {} course.", sample.category)),
            image_url: Set(String::new()),
            instructor: Set(sample.teacher.to_string()),
            price: Set(sample.price),
            category: Set(sample.category.to_string()),
            teacher_id: Set(teacher_id),
            status: Set(CourseStatus::Active.as_str().to_string()),
            created_at: Set(day_in_month(now, sample.months_back, day)?),
        }
        .insert(conn)
        .await
        .context("Failed to insert sample course")?;
        created.push((model, sample.months_back));
    }
    Ok(created)
}

/// Writes the sample rows unless they are already present.
pub async fn seed_sample_data(store: &Store, now: DateTime<Utc>) -> Result<SeedReport> {
    let conn = &store.conn;
    let courses = seed_courses(conn, now).await?;
    let mut report = SeedReport {
        courses: courses.len(),
        ..SeedReport::default()
    };

    let seeded = Enrollments::find()
        .filter(enrollments::Column::EnrollmentId.starts_with(SEED_ENROLLMENT_PREFIX))
        .count(conn)
        .await
        .context("Failed to check for sample enrollments")?;
    if seeded > 0 || courses.is_empty() {
        return Ok(report);
    }

    for (n, (course, months_back)) in courses.iter().enumerate() {
        let code = format!("{SEED_ENROLLMENT_PREFIX}{:03}", n + 1);
        let at = day_in_month(now, *months_back, 15)?;
        // Every third enrollment is left unpaid.
        let paid = n % 3 != 2;
        let status = if paid {
            EnrollmentStatus::Confirmed
        } else {
            EnrollmentStatus::Pending
        };

        enrollments::ActiveModel {
            id: NotSet,
            enrollment_id: Set(code.clone()),
            course_id: Set(course.id),
            first_name: Set("Sample".to_string()),
            last_name: Set(format!("Student {}", n + 1)),
            email: Set(format!("student{}@example.com", n + 1)),
            phone: Set(None),
            company: Set(None),
            agree_to_terms: Set(true),
            status: Set(status.as_str().to_string()),
            created_at: Set(at.clone()),
            updated_at: Set(at.clone()),
        }
        .insert(conn)
        .await
        .context("Failed to insert sample enrollment")?;
        report.enrollments += 1;

        let payment_status = if paid {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        };
        payments::ActiveModel {
            id: NotSet,
            payment_id: Set(format!("{SEED_PAYMENT_PREFIX}{:03}", n + 1)),
            enrollment_id: Set(code),
            amount: Set(course.price),
            payment_method: Set("card".to_string()),
            reference: Set(format!("SAMPLE-{}", n + 1)),
            transaction_id: Set(paid.then(|| format!("TX-SEED-{:03}", n + 1))),
            status: Set(payment_status.as_str().to_string()),
            created_at: Set(at.clone()),
            completed_at: Set(paid.then_some(at)),
        }
        .insert(conn)
        .await
        .context("Failed to insert sample payment")?;
        report.payments += 1;
    }

    info!(
        courses = report.courses,
        enrollments = report.enrollments,
        payments = report.payments,
        "Sample data seeded"
    );
    Ok(report)
}

pub async fn cmd_seed_sample_data(config: &Config) -> Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let report = seed_sample_data(&store, Utc::now()).await?;
    if report == SeedReport::default() {
        println!("Sample data already present, nothing to do.");
    } else {
        println!(
            "Seeded {} courses, {} enrollments, {} payments.",
            report.courses, report.enrollments, report.payments
        );
    }
    Ok(())
}
