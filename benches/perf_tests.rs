use criterion::{black_box, criterion_group, criterion_main, Criterion};
use log::{info, LevelFilter};
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use spsc_logger::{log_record, Logger, LoggerConfig};
use std::io;
use std::sync::Once;
use std::time::Instant;
use tempfile::tempdir;

const ITERATIONS: usize = 10_000;
// Large enough that the hot path never hits backpressure during a run.
const QUEUE_CAPACITY: usize = 1024 * 1024;

static LOG4RS_INIT: Once = Once::new();

fn setup_log4rs(log_file: &str) {
    LOG4RS_INIT.call_once(|| {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .append(true)
            .build(log_file)
            .unwrap();

        let config = Config::builder()
            .appender(Appender::builder().build("logfile", Box::new(logfile)))
            .build(Root::builder().appender("logfile").build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    });
}

fn bench_logging_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Logging Comparison");
    group.sample_size(10);

    let dir = tempdir().unwrap();

    group.bench_function("spsc_logger_hot_path", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;
            for _ in 0..iters {
                // Discard output so only the producer-side cost plus draining is timed.
                let config = LoggerConfig::default().with_capacity(QUEUE_CAPACITY);
                let mut logger = Logger::with_writer("bench", io::sink(), config).unwrap();
                let start = Instant::now();
                for i in 0..ITERATIONS {
                    log_record!(logger, "Test perf: iteration=% price=% side=%\n", i, 101.25f64, 'B');
                }
                total += start.elapsed();
                logger.close().unwrap();
            }
            total
        });
    });

    let log4rs_file = dir.path().join("log4rs.log").to_str().unwrap().to_string();
    setup_log4rs(&log4rs_file);
    group.bench_function("log4rs_file", |b| {
        b.iter(|| {
            for i in 0..ITERATIONS {
                info!("Test perf: iteration={} price={} side={}", i, 101.25f64, 'B');
            }
        });
    });

    group.bench_function("tracing_appender_non_blocking", |b| {
        let appender = tracing_appender::rolling::never(dir.path(), "tracing.log");
        let (writer, _guard) = tracing_appender::non_blocking(appender);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            b.iter(|| {
                for i in 0..ITERATIONS {
                    tracing::info!(iteration = i, price = 101.25f64, side = 'B', "Test perf");
                }
            });
        });
    });

    group.finish();
    black_box(dir);
}

criterion_group!(benches, bench_logging_comparison);
criterion_main!(benches);
