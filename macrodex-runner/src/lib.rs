//! Macrodex Runner — config, series loading, report building, export.
//!
//! This crate builds on `macrodex-core` to provide:
//! - TOML report configuration
//! - CSV series loading with dataset fingerprinting
//! - Seeded synthetic sources for demos
//! - Parallel index-history evaluation and price correlation
//! - JSON / CSV / Markdown export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod synthetic;

pub use config::{ConfigError, HistorySettings, ReportConfig, SourceFile, SourcesConfig};
pub use data_loader::{load_sources, LoadError, LoadedData};
pub use export::{export_history_csv, export_json, generate_summary, import_json, save_report};
pub use runner::{
    build_report, run_report, CorrelationSummary, MacroReport, ReportError, ReportOptions,
    SCHEMA_VERSION,
};
pub use synthetic::generate_synthetic;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn macro_report_is_send_sync() {
        assert_send::<MacroReport>();
        assert_sync::<MacroReport>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ReportConfig>();
        assert_sync::<ReportConfig>();
        assert_send::<ReportOptions>();
        assert_sync::<ReportOptions>();
    }

    #[test]
    fn loaded_data_is_send_sync() {
        assert_send::<LoadedData>();
        assert_sync::<LoadedData>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<ReportError>();
        assert_sync::<ReportError>();
    }
}
