pub mod broadcast;
pub mod watcher;
