use crate::business_days::WeekendHandling;

/// Default cap on projected occurrences per request (ten years of monthly dates).
pub const DEFAULT_MAX_OCCURRENCE_COUNT: usize = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Used when neither the row nor the owner's settings say how to treat weekends.
    pub default_weekend_handling: WeekendHandling,
    /// Upper bound for `count` on the occurrences endpoint.
    pub max_occurrence_count: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DB_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DB_URL or DATABASE_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DB_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            default_weekend_handling: match std::env::var("DEFAULT_WEEKEND_HANDLING") {
                Ok(raw) if !raw.trim().is_empty() => raw
                    .parse::<WeekendHandling>()
                    .map_err(|e| anyhow::anyhow!("DEFAULT_WEEKEND_HANDLING: {}", e))?,
                _ => WeekendHandling::default(),
            },
            max_occurrence_count: std::env::var("MAX_OCCURRENCE_COUNT")
                .unwrap_or_else(|_| DEFAULT_MAX_OCCURRENCE_COUNT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_OCCURRENCE_COUNT must be a positive number"))
                .and_then(|count: usize| {
                    if count == 0 {
                        anyhow::bail!("MAX_OCCURRENCE_COUNT must be greater than zero");
                    }
                    Ok(count)
                })?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            url_preview(&config.database_url)
        );
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Default weekend handling: {}, max occurrences: {}",
            config.default_weekend_handling,
            config.max_occurrence_count
        );

        Ok(config)
    }
}

/// First 20 characters of a connection URL, for logs.
fn url_preview(url: &str) -> String {
    url.chars().take(20).collect()
}
