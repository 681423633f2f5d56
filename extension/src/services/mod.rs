pub mod navigation;
pub mod storage;

pub use navigation::{ChromeNavigator, Navigator, RecordingNavigator};
pub use storage::{ChromeStore, MemoryStore, SettingsStore, StorageArea};
