use spsc_logger::format::{decompose, validate};
use spsc_logger::{log_record, FormatError, LogElement, Loggable, Logger, LoggerConfig};
use std::time::Duration;

fn render(fmt: &str, args: &[&dyn Loggable]) -> String {
    let mut out: Vec<LogElement> = Vec::new();
    decompose(fmt, args, &mut out).unwrap();
    out.iter().map(|e| e.to_string()).collect()
}

fn memory_logger() -> Logger<Vec<u8>> {
    let config = LoggerConfig::default()
        .with_capacity(256)
        .with_idle_interval(Duration::from_millis(1));
    Logger::with_writer("format-test", Vec::<u8>::new(), config).unwrap()
}

#[test]
fn test_placeholders_take_arguments_in_order() {
    assert_eq!(render("a%b%c", &[&1i32, &2i32]), "a1b2c");
    assert_eq!(render("%%%", &[&'z']), "%z");
    assert_eq!(render("%", &[&'x']), "x");
    assert_eq!(render("100%%", &[]), "100%");
}

#[test]
fn test_mixed_argument_kinds() {
    let owned = String::from("owned");
    let rendered = render(
        "[%|%|%|%|%|%]",
        &[&owned, &"borrowed", &-7i64, &42u32, &2.5f32, &true],
    );
    assert_eq!(rendered, "[owned|borrowed|-7|42|2.5|true]");
}

#[test]
fn test_string_argument_becomes_char_records() {
    let mut out: Vec<LogElement> = Vec::new();
    decompose("<%>", &[&"ab"], &mut out).unwrap();
    assert_eq!(
        out,
        vec![
            LogElement::Char('<'),
            LogElement::Char('a'),
            LogElement::Char('b'),
            LogElement::Char('>'),
        ]
    );
}

#[test]
fn test_validate_reports_counts() {
    assert_eq!(validate("% and %", 2), Ok(()));
    assert_eq!(
        validate("% and %", 1),
        Err(FormatError::MissingArguments { placeholders: 2, arguments: 1 })
    );
    assert_eq!(
        validate("%% only", 1),
        Err(FormatError::ExtraArguments { placeholders: 0, arguments: 1 })
    );
}

#[test]
fn test_try_log_rejects_without_enqueueing() {
    let mut logger = memory_logger();
    assert!(logger.try_log("partial %", &[]).is_err());
    assert!(logger.try_log("nothing", &[&1i32]).is_err());
    logger.try_log("ok %", &[&1i32]).unwrap();
    let output = logger.finish().unwrap();
    assert_eq!(output, b"ok 1");
}

#[test]
#[should_panic(expected = "missing arguments to log()")]
fn test_missing_argument_is_fatal() {
    let mut logger = memory_logger();
    log_record!(logger, "%");
}

#[test]
#[should_panic(expected = "extra arguments provided to log()")]
fn test_extra_argument_is_fatal() {
    let mut logger = memory_logger();
    log_record!(logger, "no placeholder", 1);
}
