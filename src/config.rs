/// Runtime knobs the request handlers need. Everything else (bind address,
/// database url, assist endpoint) is read once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub assist_daily_limit: i64,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            assist_daily_limit: dotenv::var("ASSIST_DAILY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
