use anyhow::Context;
use application::StudentApp;
use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from .env and environment variables
    let config = Config::from_env(None)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    info!("Starting student records");
    info!(database = %config.database_path, pool_size = config.pool_size, "configuration loaded");

    let app = StudentApp::new(&config).context("failed to open the student database")?;

    let courses = app.course_service.list_courses().await?;
    let students = app.student_service.list_students().await?;
    info!("{} courses, {} students on record", courses.len(), students.len());

    for course in &courses {
        info!("{}", course);
    }
    for student in &students {
        info!("{}", student);
    }

    Ok(())
}
