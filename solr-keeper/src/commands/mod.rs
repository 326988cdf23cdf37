mod backup;
mod list;
mod prune;
mod restore;
mod status;

// Backup commands
pub use backup::run_backup;

// Restore commands
pub use restore::run_restore;

// Listing commands
pub use list::run_list;

// Retention commands
pub use prune::run_prune;

// Status commands
pub use status::run_status;
