//! CLI integration tests with real INI, CSV and SVG files on disk.

mod common;

use clap::Parser;
use common::*;
use crossgate::cli::{self, Cli};
use crossgate::domain::config::DataSource;
use crossgate::domain::error::CrossgateError;
use crossgate::domain::gate::Action;
use crossgate::domain::order::{Side, TimeInForce};
use crossgate::domain::timeframe::TimeUnit;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[alpaca]
key_id = PKTEST
secret_key = s3cret

[trade]
symbol = voo
time_resolution = 10
time_unit = minute
history_start = 2024-01-01
start_date = 2024-02-21
end_date = 2024-02-21
"#;

/// Loads `path` without the process environment, so exported
/// `APCA_*` / `CROSSGATE_*` variables cannot leak into assertions.
fn load(path: &Path) -> Result<crossgate::domain::config::TradingConfig, CrossgateError> {
    cli::load_config_with_env(path, HashMap::new())
}

fn load_with(
    path: &Path,
    vars: &[(&str, &str)],
) -> Result<crossgate::domain::config::TradingConfig, CrossgateError> {
    let vars = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    cli::load_config_with_env(path, vars)
}

fn csv_ini(csv_dir: &Path, output_dir: &Path) -> String {
    format!(
        r#"
[trade]
symbol = VOO
time_resolution = 10
time_unit = minute
history_start = 2024-01-01
start_date = 2024-02-21
end_date = 2024-02-21
time_in_force = day

[data]
source = csv
csv_dir = {}

[report]
output_dir = {}
"#,
        csv_dir.display(),
        output_dir.display()
    )
}

/// 60 falling ten-minute bars on 2024-02-21 and 40 rising daily bars.
fn write_csv_fixtures(dir: &Path) {
    let mut feed = String::from("timestamp,open,high,low,close,volume\n");
    for i in 0..60 {
        let close = 440.0 - 0.25 * i as f64;
        let minutes = 9 * 60 + 30 + 10 * i;
        writeln!(
            feed,
            "2024-02-21T{:02}:{:02}:00Z,{},{},{},{},1000",
            minutes / 60,
            minutes % 60,
            close,
            close + 0.5,
            close - 0.5,
            close
        )
        .unwrap();
    }
    fs::write(dir.join("VOO_10Min.csv"), feed).unwrap();

    let mut daily = String::from("timestamp,open,high,low,close,volume\n");
    let start = date(2024, 1, 2);
    for i in 0..40 {
        let close = 400.0 + i as f64;
        let day = start + chrono::Duration::days(i);
        writeln!(daily, "{},{},{},{},{},50000", day, close, close, close, close).unwrap();
    }
    fs::write(dir.join("VOO_1Day.csv"), daily).unwrap();
}

mod config_loading {
    use super::*;

    #[test]
    fn resolves_defaults() {
        let ini = write_temp_ini(VALID_INI);
        let config = load(ini.path()).unwrap();

        assert_eq!(config.symbol, "VOO");
        assert_eq!(config.resolution.amount, 10);
        assert_eq!(config.resolution.unit, TimeUnit::Minute);
        assert_eq!(config.short_window, 10);
        assert_eq!(config.long_window, 50);
        assert_eq!(config.quantity, 1);
        assert_eq!(config.time_in_force, TimeInForce::Gtc);
        assert_eq!(config.histogram_bins, 25);
        assert_eq!(config.source, DataSource::Alpaca);
        assert_eq!(config.start_date, date(2024, 2, 21));
    }

    #[test]
    fn missing_file_is_config_parse() {
        let err = load(Path::new("/nonexistent/crossgate.ini")).unwrap_err();
        assert!(matches!(err, CrossgateError::ConfigParse { .. }));
    }

    #[test]
    fn invalid_values_rejected() {
        let ini = write_temp_ini(&VALID_INI.replace("time_resolution = 10", "time_resolution = 90"));
        let err = load(ini.path()).unwrap_err();
        assert!(matches!(err, CrossgateError::ConfigInvalid { .. }));
    }

    #[test]
    fn malformed_env_override_rejected() {
        let ini = write_temp_ini(VALID_INI);
        let err = load_with(ini.path(), &[("CROSSGATE_TRADE_QUANTITY", "1OO")]).unwrap_err();
        assert!(matches!(err, CrossgateError::ConfigInvalid { key, .. } if key == "quantity"));
    }

    #[test]
    fn secret_not_in_debug_output() {
        let ini = write_temp_ini(VALID_INI);
        let config = load(ini.path()).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("PKTEST"));
        assert!(!debug.contains("s3cret"));
    }
}

mod ports {
    use super::*;

    #[test]
    fn live_orders_need_credentials() {
        let dir = TempDir::new().unwrap();
        let ini = write_temp_ini(&csv_ini(dir.path(), dir.path()));
        let config = load(ini.path()).unwrap();

        match cli::build_order_port(&config, false) {
            Err(CrossgateError::ConfigMissing { key, .. }) => assert_eq!(key, "key_id"),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("expected missing credentials"),
        }
        assert!(cli::build_order_port(&config, true).is_ok());
    }

    #[test]
    fn credentials_from_environment_enable_live_orders() {
        let dir = TempDir::new().unwrap();
        let ini = write_temp_ini(&csv_ini(dir.path(), dir.path()));
        let config = load_with(
            ini.path(),
            &[("APCA_API_KEY_ID", "PKENV"), ("APCA_API_SECRET_KEY", "envsecret")],
        )
        .unwrap();

        assert_eq!(config.broker.credentials.key_id, "PKENV");
        assert!(cli::build_order_port(&config, false).is_ok());
    }
}

mod csv_dry_run {
    use super::*;
    use crossgate::adapters::dry_run_adapter::DryRunAdapter;
    use crossgate::adapters::svg_report::SvgReportAdapter;

    #[test]
    fn full_pipeline_from_files() {
        let dir = TempDir::new().unwrap();
        let csv_dir = dir.path().join("data");
        let out_dir = dir.path().join("reports");
        fs::create_dir_all(&csv_dir).unwrap();
        write_csv_fixtures(&csv_dir);

        let ini = write_temp_ini(&csv_ini(&csv_dir, &out_dir));
        let config = load(ini.path()).unwrap();
        let data = cli::build_data_port(&config).unwrap();
        let orders = DryRunAdapter::new();
        let reporter = SvgReportAdapter::new(config.output_dir.clone());

        let summary =
            cli::run_trade_pipeline(&config, data.as_ref(), &orders, Some(&reporter)).unwrap();

        assert_eq!(summary.action, Action::SubmitSell);
        assert_eq!(summary.bars, 60);
        assert_eq!(summary.history_bars, 40);

        let sent = orders.submitted();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].side, Side::Sell);
        assert_eq!(sent[0].time_in_force, TimeInForce::Day);

        assert!(out_dir.join("VOO_var.svg").exists());
        assert!(out_dir.join("VOO_feed.svg").exists());
    }

    #[test]
    fn run_command_succeeds_without_charts() {
        let dir = TempDir::new().unwrap();
        write_csv_fixtures(dir.path());
        let out_dir = dir.path().join("reports");
        let ini = write_temp_ini(&csv_ini(dir.path(), &out_dir));

        let cli = Cli::try_parse_from([
            "crossgate",
            "run",
            "-c",
            ini.path().to_str().unwrap(),
            "--dry-run",
            "--no-charts",
        ])
        .unwrap();
        let code = cli::run(cli);

        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
        assert!(!out_dir.exists());
    }

    #[test]
    fn run_command_fails_on_missing_csv() {
        let dir = TempDir::new().unwrap();
        let ini = write_temp_ini(&csv_ini(dir.path(), dir.path()));

        let cli = Cli::try_parse_from([
            "crossgate",
            "run",
            "-c",
            ini.path().to_str().unwrap(),
            "--dry-run",
        ])
        .unwrap();
        let code = cli::run(cli);

        assert_ne!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn validate_command_succeeds() {
        let ini = write_temp_ini(VALID_INI);
        let cli =
            Cli::try_parse_from(["crossgate", "validate", "-c", ini.path().to_str().unwrap()])
                .unwrap();
        let code = cli::run(cli);
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
    }
}
