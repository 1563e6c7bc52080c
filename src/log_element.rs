use std::fmt;

use crate::spsc_queue::Producer;

/// A single scalar payload queued between the hot path and the drain thread.
///
/// Every variant carries its value inline, so an element never refers back to
/// memory owned by the producer. Strings travel as a run of [`LogElement::Char`]
/// records instead of by reference.
///
/// # Examples
///
/// ```
/// # use spsc_logger::LogElement;
/// let element = LogElement::from(42i32);
/// assert_eq!(element, LogElement::I32(42));
/// assert_eq!(element.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogElement {
    Char(char),
    I8(i8),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

/// Discriminant of a [`LogElement`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Char,
    I8,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
}

impl LogElement {
    #[inline]
    pub fn kind(&self) -> LogKind {
        match self {
            LogElement::Char(_) => LogKind::Char,
            LogElement::I8(_) => LogKind::I8,
            LogElement::I32(_) => LogKind::I32,
            LogElement::I64(_) => LogKind::I64,
            LogElement::U32(_) => LogKind::U32,
            LogElement::U64(_) => LogKind::U64,
            LogElement::F32(_) => LogKind::F32,
            LogElement::F64(_) => LogKind::F64,
        }
    }
}

// Ring slots are preallocated with this value.
impl Default for LogElement {
    fn default() -> Self {
        LogElement::Char('\0')
    }
}

impl fmt::Display for LogElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogElement::Char(c) => write!(f, "{}", c),
            LogElement::I8(v) => write!(f, "{}", v),
            LogElement::I32(v) => write!(f, "{}", v),
            LogElement::I64(v) => write!(f, "{}", v),
            LogElement::U32(v) => write!(f, "{}", v),
            LogElement::U64(v) => write!(f, "{}", v),
            LogElement::F32(v) => write!(f, "{}", v),
            LogElement::F64(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for LogElement {
                #[inline(always)]
                fn from(value: $ty) -> Self {
                    LogElement::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    char => Char,
    i8 => I8,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

/// Destination for decomposed [`LogElement`]s.
///
/// The hot path pushes straight into the channel's [`Producer`]; a `Vec` is
/// handy for inspecting what a call would enqueue.
pub trait ElementSink {
    fn push_element(&mut self, element: LogElement);
}

impl ElementSink for Producer<LogElement> {
    #[inline(always)]
    fn push_element(&mut self, element: LogElement) {
        self.push(element);
    }
}

impl ElementSink for Vec<LogElement> {
    #[inline]
    fn push_element(&mut self, element: LogElement) {
        self.push(element);
    }
}
