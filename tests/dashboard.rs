use std::io::Write;

use trailwatch::{
    parse_config, parse_samples, render_config, App, ChannelSource, ConfigSet, Dashboard,
    DataSource, Distribution, FileSource, HealthStatus, SampleFilter, SampleType, SensorType,
    Theme,
};

const ACCEL_LOG: &str = "1,8,8370,1.008798,4\n1,8,8381,1.003714,4\n1,8,8398,1.006280,4\n";

const MIXED_LOG: &str = "\
0,0,13199,86.511078,0
0,1,13208,65.0,1
0,0,13300,88.0,1
";

#[test]
fn accelerometer_statistics() {
    let samples = parse_samples(ACCEL_LOG);
    let dashboard = Dashboard::build(&samples, &ConfigSet::default(), SampleFilter::all());

    let stats = dashboard.stats;
    assert_eq!(stats.count, 3);
    assert!((stats.mean - 1.00626).abs() < 1e-5);
    assert_eq!(stats.min, 1.003714);
    assert_eq!(stats.max, 1.008798);
    assert!((stats.duration_minutes - 28.0 / 60_000.0).abs() < 1e-12);
    assert_eq!(
        dashboard.distribution(),
        Distribution::Counts(vec![(HealthStatus::ExtremelyHigh, 3)])
    );
}

#[test]
fn series_grouped_by_first_appearance() {
    let samples = parse_samples(MIXED_LOG);
    let dashboard = Dashboard::build(&samples, &ConfigSet::default(), SampleFilter::all());

    let labels: Vec<String> = dashboard.series.iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["OXIMETER - SPO2", "OXIMETER - HEART_RATE"]);
    assert_eq!(dashboard.series[0].samples.len(), 2);
    assert_eq!(dashboard.time_labels().len(), 3);
}

#[test]
fn filter_with_no_matches_is_empty_not_error() {
    let samples = parse_samples(MIXED_LOG);
    let filter = SampleFilter::new(Some(SensorType::Gps), Some(SampleType::Latitude));
    let dashboard = Dashboard::build(&samples, &ConfigSet::default(), filter);

    assert!(dashboard.is_empty());
    assert_eq!(dashboard.stats.mean, 0.0);
    assert_eq!(dashboard.distribution(), Distribution::NoData);
    assert_eq!(dashboard.total_samples, 3);
}

#[test]
fn generated_config_parses_back() {
    let configs = ConfigSet::demo();
    let text = render_config(configs.rows());
    assert!(text.starts_with("# "));
    assert_eq!(parse_config(&text), configs.rows());
}

#[test]
fn app_follows_watched_files() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("samples.log");
    let config_path = dir.path().join("config.txt");
    std::fs::write(&data_path, MIXED_LOG).unwrap();
    std::fs::write(&config_path, "0,0,0,90,98,200,300\n").unwrap();

    let mut app = App::new(Box::new(FileSource::new(&data_path)), Theme::dark())
        .with_config_source(Box::new(FileSource::new(&config_path)));
    assert!(app.reload_data().unwrap());
    assert_eq!(app.samples.len(), 3);
    assert_eq!(app.configs.len(), 1);

    // 86.5 exceeds the first threshold only: classified EXTREMELY_LOW like the log says.
    // 88.0 is logged LOW but classifies EXTREMELY_LOW.
    assert_eq!(app.dashboard.mismatches, 1);

    // Make sure the modification time moves on coarse filesystems
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let mut file = std::fs::OpenOptions::new().append(true).open(&data_path).unwrap();
    writeln!(file, "2,3,14000,51.5,2").unwrap();
    drop(file);

    assert!(app.reload_data().unwrap());
    assert_eq!(app.samples.len(), 4);
}

#[test]
fn app_filter_apply_and_clear() {
    let (tx, source) = ChannelSource::create("integration");
    let mut app = App::new(Box::new(source), Theme::dark()).with_configs(ConfigSet::demo());
    tx.send(format!("{}{}", ACCEL_LOG, MIXED_LOG)).unwrap();
    app.reload_data().unwrap();
    assert_eq!(app.dashboard.samples.len(), 6);

    app.cycle_sample_filter(true); // SPO2
    app.apply_filters();
    assert_eq!(app.dashboard.samples.len(), 2);
    assert_eq!(app.dashboard.series.len(), 1);

    app.clear_filters();
    assert_eq!(app.dashboard.samples.len(), 6);
    assert_eq!(app.source_description(), "channel: integration");
}

#[test]
fn channel_source_is_a_data_source() {
    let mut source: Box<dyn DataSource> = Box::new(ChannelSource::from_text(ACCEL_LOG, "boxed"));
    assert_eq!(source.poll().as_deref(), Some(ACCEL_LOG));
    assert!(source.poll().is_none());
}
