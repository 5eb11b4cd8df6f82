use std::io::Write;

use almanac_core::cli::GlobalCli;
use almanac_core::{Calendar, CalendarConfig, NavigationMode, ViewType, snapshot_for};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::Parser;
use tempfile::NamedTempFile;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 16, 12, 0, 0)
        .single()
        .expect("valid now")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn navigating_dates_and_views_together() {
    let mut calendar = Calendar::with_now(
        CalendarConfig {
            date: Some("2025-07-16T09:00:00".into()),
            view: Some(ViewType::Month),
            skip_views: vec![ViewType::Week],
            ..CalendarConfig::default()
        },
        now(),
    )
    .expect("calendar");

    calendar.navigate(NavigationMode::Date, 1).expect("next month");
    assert_eq!(calendar.target().date(), day(2025, 8, 16));

    calendar.navigate(NavigationMode::View, -1).expect("finer view");
    assert_eq!(calendar.view(), ViewType::Day);
    assert!(!calendar.has_prev_view());

    calendar.navigate(NavigationMode::Date, -1).expect("previous day");
    assert_eq!(calendar.target().date(), day(2025, 8, 15));

    let data = calendar.data().expect("data");
    let cell = &data.as_day().expect("day view").cells[0][0];
    assert_eq!((cell.month_index, cell.day_of_month), (7, 15));
}

#[test]
fn unknown_navigation_mode_is_rejected() {
    let err = "week".parse::<NavigationMode>().expect_err("bad mode");
    assert_eq!(err.code(), "INVALID_NAV_MODE");
}

#[test]
fn target_outside_bounds_fails_construction() {
    let err = Calendar::with_now(
        CalendarConfig {
            date: Some("2030-01-01".into()),
            bounds: almanac_core::RawBounds::new(None, Some("2029-12-31".into())),
            ..CalendarConfig::default()
        },
        now(),
    )
    .expect_err("out of bounds");
    assert_eq!(err.code(), "OUT_OF_BOUNDS");
}

#[test]
fn time_zone_rebases_target_and_today() {
    let calendar = Calendar::with_now(
        CalendarConfig {
            time_zone: Some("Asia/Tokyo".to_string()),
            ..CalendarConfig::default()
        },
        Utc.with_ymd_and_hms(2025, 7, 16, 20, 0, 0)
            .single()
            .expect("valid now"),
    )
    .expect("calendar");
    assert_eq!(calendar.target().date(), day(2025, 7, 17));
    assert_eq!(calendar.today().date(), day(2025, 7, 17));

    let err = Calendar::with_now(
        CalendarConfig {
            time_zone: Some("Nowhere/Special".to_string()),
            ..CalendarConfig::default()
        },
        now(),
    )
    .expect_err("bad zone");
    assert_eq!(err.code(), "INVALID_DATE");
}

#[test]
fn cli_snapshot_from_config_file_and_flags() {
    let mut file = NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        "date = \"2025-07-16T09:00:00\"\nview = \"week\"\n\n[disable]\nweekends = true\n"
    )
    .expect("write config");
    let config = file.path().to_string_lossy().to_string();

    let cli = GlobalCli::parse_from([
        "almanac",
        "--config",
        config.as_str(),
        "--now",
        "2025-07-16T12:00:00Z",
        "--jump",
        "2025-07-02",
        "--nav",
        "date:+1",
        "--nav",
        "view:+1",
    ]);
    let snapshot = snapshot_for(&cli).expect("snapshot");

    assert_eq!(snapshot.view, ViewType::Month);
    assert_eq!(snapshot.target.date(), day(2025, 7, 9));

    let json = serde_json::to_value(&snapshot).expect("json");
    assert_eq!(json["data"]["view"], "month");
    assert_eq!(json["data"]["isCurrentMonth"], true);
    // Sunday June 29th opens the grid and is a weekend
    assert_eq!(json["data"]["cells"][0][0]["dayOfMonth"], 29);
    assert_eq!(json["data"]["cells"][0][0]["isDisabled"], true);
    assert_eq!(json["data"]["cells"][0][1]["isDisabled"], false);
}

#[test]
fn cli_zero_navigation_step_keeps_target() {
    let base = ["almanac", "--config", "/dev/null", "--now", "2025-07-16T12:00:00"];
    let plain = snapshot_for(&GlobalCli::parse_from(base)).expect("plain");
    let stepped = snapshot_for(&GlobalCli::parse_from(
        base.into_iter().chain(["--nav", "date:0", "--nav", "view:0"]),
    ))
    .expect("zero steps");
    assert_eq!(stepped, plain);
    assert_eq!(stepped.target.date(), day(2025, 7, 16));
}

#[test]
fn wall_clock_past_last_date_fails_construction() {
    let err = Calendar::with_now(
        CalendarConfig {
            date: Some("2025-07-16".into()),
            bounds: almanac_core::RawBounds::new(
                None,
                Some(almanac_core::DateInput::Date(NaiveDateTime::MAX)),
            ),
            time_zone: Some("Asia/Tokyo".into()),
            ..CalendarConfig::default()
        },
        now(),
    )
    .expect_err("bound cannot be shifted east");
    assert_eq!(err.code(), "INVALID_DATE");
}
