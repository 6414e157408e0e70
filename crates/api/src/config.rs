use std::path::PathBuf;

use roilabel_core::allocation::normalize_threshold;
use roilabel_core::geometry::FieldOfView;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// `JWT_SECRET`. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
    /// Field-of-view dimensions, used only for bounds validation at
    /// region-creation time.
    pub field_of_view: FieldOfView,
    /// Distinct labelers required before a region is complete. `None`
    /// means no completion cap: every region stays eligible forever.
    pub labelers_required_per_region: Option<i64>,
    /// Whether region assignment biases toward near-complete regions.
    pub prioritize_by_label_count: bool,
    /// Backup task configuration.
    pub backup: BackupConfig,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

/// Configuration for the periodic database backup task.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Directory backups are written to.
    pub dir: PathBuf,
    /// Seconds between checks for new labels (default: `300`).
    pub interval_secs: u64,
    /// Number of backups to retain (default: `1`).
    pub retention_count: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default          |
    /// |--------------------------------|------------------|
    /// | `HOST`                         | `0.0.0.0`        |
    /// | `PORT`                         | `3000`           |
    /// | `CORS_ORIGINS`                 | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`             |
    /// | `DATABASE_PATH`                | `labels.db`      |
    /// | `FIELD_OF_VIEW_DIMENSIONS`     | `512x512`        |
    /// | `LABELERS_REQUIRED_PER_REGION` | `3` (`none` disables the cap) |
    /// | `PRIORITIZE_BY_LABEL_COUNT`    | `true`           |
    /// | `BACKUP_DIR`                   | `backups`        |
    /// | `BACKUP_INTERVAL_SECS`         | `300`            |
    /// | `BACKUP_RETENTION_COUNT`       | `1`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_path =
            PathBuf::from(std::env::var("DATABASE_PATH").unwrap_or_else(|_| "labels.db".into()));

        let field_of_view = parse_field_of_view(
            &std::env::var("FIELD_OF_VIEW_DIMENSIONS").unwrap_or_else(|_| "512x512".into()),
        );

        let labelers_required_per_region = parse_threshold(
            std::env::var("LABELERS_REQUIRED_PER_REGION")
                .ok()
                .as_deref(),
        );

        let prioritize_by_label_count: bool = std::env::var("PRIORITIZE_BY_LABEL_COUNT")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("PRIORITIZE_BY_LABEL_COUNT must be true or false");

        let backup = BackupConfig {
            dir: PathBuf::from(std::env::var("BACKUP_DIR").unwrap_or_else(|_| "backups".into())),
            interval_secs: std::env::var("BACKUP_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .expect("BACKUP_INTERVAL_SECS must be a valid u64"),
            retention_count: std::env::var("BACKUP_RETENTION_COUNT")
                .unwrap_or_else(|_| "1".into())
                .parse()
                .expect("BACKUP_RETENTION_COUNT must be a valid usize"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_path,
            field_of_view,
            labelers_required_per_region,
            prioritize_by_label_count,
            backup,
            jwt,
        }
    }

    /// The sqlx connection URL for the configured database file.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.database_path.display())
    }
}

/// Parse `WIDTHxHEIGHT` field-of-view dimensions.
fn parse_field_of_view(value: &str) -> FieldOfView {
    let (width, height) = value
        .split_once(['x', 'X'])
        .expect("FIELD_OF_VIEW_DIMENSIONS must look like 512x512");
    FieldOfView {
        width: width
            .trim()
            .parse()
            .expect("FIELD_OF_VIEW_DIMENSIONS width must be an integer"),
        height: height
            .trim()
            .parse()
            .expect("FIELD_OF_VIEW_DIMENSIONS height must be an integer"),
    }
}

/// Parse the completion threshold.
///
/// Absent defaults to 3 labelers per region. `none` (or an empty value)
/// disables the cap entirely, and non-positive values are normalized to
/// "no cap" rather than rejected -- a benign administrative input.
fn parse_threshold(value: Option<&str>) -> Option<i64> {
    match value {
        None => Some(3),
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("none") => None,
        Some(s) => normalize_threshold(Some(
            s.parse()
                .expect("LABELERS_REQUIRED_PER_REGION must be an integer or 'none'"),
        )),
    }
}
