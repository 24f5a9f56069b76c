pub mod dashboard;

pub use dashboard::AppConfig;
