//! Database-independent logic shared by guildhall front ends: the in-memory
//! row filter, the live-search debouncer, date normalization and settings.

pub mod debounce;
pub mod filter;
pub mod settings;
pub mod util;

pub use debounce::{Debouncer, DEFAULT_SEARCH_DELAY};
pub use filter::{row_matches, MatchMode, MatchModeParseError, RowFilter};
pub use settings::{load_settings, resolve_db_path, save_settings, Settings, SettingsError};
pub use util::{normalize_date, normalize_datetime, today, DateError};
