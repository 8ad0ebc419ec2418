use std::env;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub appointments_data_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            appointments_data_file: env::var("APPOINTMENTS_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("APPOINTMENTS_DATA_FILE not set, using default data/appointments.json");
                    PathBuf::from("data/appointments.json")
                }),
        }
    }
}
