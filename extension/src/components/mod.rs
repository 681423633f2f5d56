mod config_page;
mod launcher_page;

pub use config_page::ConfigPage;
pub use launcher_page::LauncherPage;
