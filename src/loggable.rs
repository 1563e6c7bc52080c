use crate::log_element::{ElementSink, LogElement};

/// A value that can be broken down into [`LogElement`] records.
///
/// Scalars become exactly one record. Text becomes one [`LogElement::Char`]
/// per character, in order, with no terminator record. The trait is object
/// safe so format arguments can be passed as `&[&dyn Loggable]`.
///
/// # Examples
///
/// ```
/// # use spsc_logger::{LogElement, Loggable};
/// let mut out: Vec<LogElement> = Vec::new();
/// "hi".push_elements(&mut out);
/// 7u64.push_elements(&mut out);
/// assert_eq!(
///     out,
///     vec![LogElement::Char('h'), LogElement::Char('i'), LogElement::U64(7)]
/// );
/// ```
pub trait Loggable {
    fn push_elements(&self, sink: &mut dyn ElementSink);
}

macro_rules! impl_loggable_scalar {
    ($($ty:ty => $variant:ident as $stored:ty),* $(,)?) => {
        $(
            impl Loggable for $ty {
                #[inline(always)]
                fn push_elements(&self, sink: &mut dyn ElementSink) {
                    sink.push_element(LogElement::$variant(*self as $stored));
                }
            }
        )*
    };
}

impl_loggable_scalar! {
    i8 => I8 as i8,
    i16 => I32 as i32,
    i32 => I32 as i32,
    i64 => I64 as i64,
    isize => I64 as i64,
    u8 => U32 as u32,
    u16 => U32 as u32,
    u32 => U32 as u32,
    u64 => U64 as u64,
    usize => U64 as u64,
    f32 => F32 as f32,
    f64 => F64 as f64,
}

impl Loggable for char {
    #[inline(always)]
    fn push_elements(&self, sink: &mut dyn ElementSink) {
        sink.push_element(LogElement::Char(*self));
    }
}

impl Loggable for bool {
    fn push_elements(&self, sink: &mut dyn ElementSink) {
        let text = if *self { "true" } else { "false" };
        text.push_elements(sink);
    }
}

impl Loggable for str {
    #[inline]
    fn push_elements(&self, sink: &mut dyn ElementSink) {
        for c in self.chars() {
            sink.push_element(LogElement::Char(c));
        }
    }
}

impl Loggable for String {
    #[inline]
    fn push_elements(&self, sink: &mut dyn ElementSink) {
        self.as_str().push_elements(sink);
    }
}

impl Loggable for LogElement {
    #[inline(always)]
    fn push_elements(&self, sink: &mut dyn ElementSink) {
        sink.push_element(*self);
    }
}

impl<T: Loggable + ?Sized> Loggable for &T {
    #[inline(always)]
    fn push_elements(&self, sink: &mut dyn ElementSink) {
        (**self).push_elements(sink);
    }
}
