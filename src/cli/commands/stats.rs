//! Stats command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_stats(config: Config) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let overview = state.admin_service.overview_stats().await?;
    let payments = state.enrollment_service.payment_stats().await?;
    let courses = state.store.courses().count().await?;

    println!("Overview");
    println!("{:-<40}", "");
    println!("{:<10} {:>12} {:>14}", "Month", "New classes", "Income");
    for ((month, classes), income) in overview
        .months
        .iter()
        .zip(&overview.new_classes_per_month)
        .zip(&overview.income_per_month)
    {
        println!("{month:<10} {classes:>12} {income:>14.2}");
    }
    println!();
    println!("Courses:              {courses}");
    println!("Pending enrollments:  {}", overview.pending_enrollments);
    println!(
        "Payments:             {} total, {} completed, {} pending, {} failed",
        payments.total, payments.completed, payments.pending, payments.failed
    );

    Ok(())
}
