// src/config/consts.rs

// Net config
pub const STATUS_URL: &str = "http://sbfictd01.cl.gemini.edu/ChangeRequestGMOScassette.php";
pub const HTTP_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("masksync/", env!("CARGO_PKG_VERSION"));

// Local lookup files
pub const DEFAULT_FILES_DIR: &str = ".";
pub const INSTALLED_FILE: &str = "msk.lut";
pub const KNOWN_FILE: &str = "masks.lut";

// Environment
pub const FILES_DIR_ENV: &str = "MASKSYNC_FILES_DIR";
pub const LOG_ENV: &str = "MASKSYNC_LOG";

// Backup suffix, appended as `<file>.<date>`
pub const BACKUP_DATE_FMT: &str = "%Y%m%d";
