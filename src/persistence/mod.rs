pub mod files;
pub mod settings;
pub mod store;

pub use files::{
    atomic_write, backup_file, ensure_data_dir, init_local_data_dir, log_file, read_file,
    settings_file, store_file,
};
pub use settings::{load_settings, save_settings, Settings};
pub use store::{date_key, parse_import, TaskStore, DATE_KEY_FORMAT};
