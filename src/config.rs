use std::path::PathBuf;
use std::time::Duration;

pub const MENU_URL: &str = "https://mcdonalds.ee/meie-menuu/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub listing_url: String,
    pub workers: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub summary_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: MENU_URL.to_string(),
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
            csv_path: PathBuf::from("mcdonalds_ee_menu_nutrition.csv"),
            json_path: PathBuf::from("mcdonalds_ee_menu_nutrition.json"),
            summary_path: None,
        }
    }
}
