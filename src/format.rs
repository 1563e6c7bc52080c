//! Placeholder decomposition for `log(format, args...)` calls.
//!
//! A format string is scanned left to right. `%%` stands for one literal `%`,
//! any other `%` is replaced by the next argument, and every remaining character
//! is queued as itself. The call is checked before anything is pushed, so a
//! malformed call never leaves half a message in the channel.

use crate::error::FormatError;
use crate::log_element::{ElementSink, LogElement};
use crate::loggable::Loggable;

const PLACEHOLDER: char = '%';

/// Counts the argument placeholders in `fmt`.
///
/// # Examples
///
/// ```
/// # use spsc_logger::format::count_placeholders;
/// assert_eq!(count_placeholders("a%b%c"), 2);
/// assert_eq!(count_placeholders("100%%"), 0);
/// assert_eq!(count_placeholders("%"), 1);
/// ```
pub fn count_placeholders(fmt: &str) -> usize {
    let mut count = 0;
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c == PLACEHOLDER {
            if chars.peek() == Some(&PLACEHOLDER) {
                chars.next();
            } else {
                count += 1;
            }
        }
    }
    count
}

/// Checks that `fmt` consumes exactly `arguments` arguments.
pub fn validate(fmt: &str, arguments: usize) -> Result<(), FormatError> {
    let placeholders = count_placeholders(fmt);
    if placeholders > arguments {
        Err(FormatError::MissingArguments { placeholders, arguments })
    } else if placeholders < arguments {
        Err(FormatError::ExtraArguments { placeholders, arguments })
    } else {
        Ok(())
    }
}

/// Validates the call and pushes its records into `sink`.
///
/// On error nothing has been pushed.
///
/// # Examples
///
/// ```
/// # use spsc_logger::{LogElement, Loggable};
/// # use spsc_logger::format::decompose;
/// let mut out: Vec<LogElement> = Vec::new();
/// decompose("a%b%c", &[&1i32, &2i32], &mut out).unwrap();
/// let text: String = out.iter().map(|e| e.to_string()).collect();
/// assert_eq!(text, "a1b2c");
/// ```
pub fn decompose(
    fmt: &str,
    args: &[&dyn Loggable],
    sink: &mut dyn ElementSink,
) -> Result<(), FormatError> {
    validate(fmt, args.len())?;

    let mut args = args.iter();
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c == PLACEHOLDER {
            if chars.peek() == Some(&PLACEHOLDER) {
                chars.next();
            } else if let Some(arg) = args.next() {
                arg.push_elements(sink);
                continue;
            }
        }
        sink.push_element(LogElement::Char(c));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fmt: &str, args: &[&dyn Loggable]) -> Result<String, FormatError> {
        let mut out: Vec<LogElement> = Vec::new();
        decompose(fmt, args, &mut out)?;
        Ok(out.iter().map(|e| e.to_string()).collect())
    }

    #[test]
    fn test_placeholder_counting() {
        assert_eq!(count_placeholders(""), 0);
        assert_eq!(count_placeholders("plain"), 0);
        assert_eq!(count_placeholders("%%%"), 1);
        assert_eq!(count_placeholders("%%%%"), 0);
        assert_eq!(count_placeholders("% %"), 2);
    }

    #[test]
    fn test_escaped_percent() {
        assert_eq!(render("100%%", &[]).unwrap(), "100%");
        assert_eq!(render("%%%", &[&5u32]).unwrap(), "%5");
    }

    #[test]
    fn test_argument_only() {
        assert_eq!(render("%", &[&'x']).unwrap(), "x");
    }

    #[test]
    fn test_mismatch_pushes_nothing() {
        let mut out: Vec<LogElement> = Vec::new();
        let err = decompose("abc %", &[], &mut out).unwrap_err();
        assert_eq!(err, FormatError::MissingArguments { placeholders: 1, arguments: 0 });
        assert!(out.is_empty());

        let err = decompose("no placeholder", &[&1i32], &mut out).unwrap_err();
        assert_eq!(err, FormatError::ExtraArguments { placeholders: 0, arguments: 1 });
        assert!(out.is_empty());
    }
}
