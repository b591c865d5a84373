//! Canonical item encoding.
//!
//! Every item added to a sketch is first turned into a sequence of canonical bytes,
//! and row hashers only ever look at those bytes. Two items count as the same item
//! exactly when their canonical bytes are equal, so the encoding has to be
//! deterministic and structural: equal values must encode identically regardless of
//! where they live in memory.
//!
//! The encoding is JSON-like:
//! - strings and chars are quoted and escaped (`"foo"`)
//! - integers and finite floats are written in decimal, non-finite floats as `null`
//! - `()` and `None` are written as `null`, `Some(v)` as `v`
//! - slices, arrays, vectors and tuples are written as `[a,b,c]`
//! - records written through [`Record`] become `{"name":"Alice","age":25}`
//!
//! Record fields are emitted in the order `field` is called, which keeps the encoding
//! stable as long as an implementation always visits fields in the same order.

/// Conversion of an item into canonical bytes
pub trait Canonicalize {
    /// Append canonical bytes of `self` to `out`
    fn canonicalize(&self, out: &mut Vec<u8>);

    /// Return canonical bytes of `self` as a new vector
    fn to_canonical(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.canonicalize(&mut out);
        out
    }
}

/// Writer for record-like items (structs), producing `{"field":value,...}`
///
/// ```
/// use frequency_estimator::canonical::{Canonicalize, Record};
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl Canonicalize for User {
///     fn canonicalize(&self, out: &mut Vec<u8>) {
///         Record::new(out)
///             .field("name", &self.name)
///             .field("age", &self.age)
///             .finish();
///     }
/// }
///
/// let user = User { name: "Alice".to_string(), age: 25 };
/// assert_eq!(user.to_canonical(), br#"{"name":"Alice","age":25}"#);
/// ```
#[must_use = "call `finish` to close the record"]
pub struct Record<'a> {
    out: &'a mut Vec<u8>,
    empty: bool,
}

impl<'a> Record<'a> {
    /// Open a new record in `out`
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        out.push(b'{');
        Self { out, empty: true }
    }

    /// Append a named field
    pub fn field<T: Canonicalize + ?Sized>(self, name: &str, value: &T) -> Self {
        let Self { out, empty } = self;
        if !empty {
            out.push(b',');
        }
        write_str(out, name);
        out.push(b':');
        value.canonicalize(out);
        Self { out, empty: false }
    }

    /// Close the record
    pub fn finish(self) {
        self.out.push(b'}');
    }
}

/// Write a quoted string with JSON escapes
fn write_str(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    for &b in s.as_bytes() {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            0x00..=0x1f => {
                const HEX: &[u8; 16] = b"0123456789abcdef";
                out.extend_from_slice(b"\\u00");
                out.push(HEX[usize::from(b >> 4)]);
                out.push(HEX[usize::from(b & 0xf)]);
            }
            _ => out.push(b),
        }
    }
    out.push(b'"');
}

/// Write a sequence of items as `[a,b,c]`
fn write_seq<'a, T, I>(out: &mut Vec<u8>, items: I)
where
    T: Canonicalize + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    out.push(b'[');
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        item.canonicalize(out);
    }
    out.push(b']');
}

impl Canonicalize for str {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        write_str(out, self);
    }
}

impl Canonicalize for String {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        write_str(out, self);
    }
}

impl Canonicalize for char {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        write_str(out, self.encode_utf8(&mut buf));
    }
}

impl Canonicalize for bool {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(if *self { b"true" } else { b"false" });
    }
}

impl Canonicalize for () {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"null");
    }
}

macro_rules! canonicalize_integer {
    ($($t:ty),*) => {
        $(
            impl Canonicalize for $t {
                fn canonicalize(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(self.to_string().as_bytes());
                }
            }
        )*
    };
}

canonicalize_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! canonicalize_float {
    ($($t:ty),*) => {
        $(
            impl Canonicalize for $t {
                fn canonicalize(&self, out: &mut Vec<u8>) {
                    if self.is_finite() {
                        out.extend_from_slice(self.to_string().as_bytes());
                    } else {
                        out.extend_from_slice(b"null");
                    }
                }
            }
        )*
    };
}

canonicalize_float!(f32, f64);

impl<T: Canonicalize> Canonicalize for Option<T> {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        match self {
            Some(value) => value.canonicalize(out),
            None => out.extend_from_slice(b"null"),
        }
    }
}

impl<T: Canonicalize> Canonicalize for [T] {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        write_seq(out, self);
    }
}

impl<T: Canonicalize, const N: usize> Canonicalize for [T; N] {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        write_seq(out, self);
    }
}

impl<T: Canonicalize> Canonicalize for Vec<T> {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        write_seq(out, self);
    }
}

impl<T: Canonicalize + ?Sized> Canonicalize for &T {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        (**self).canonicalize(out);
    }
}

impl<T: Canonicalize + ?Sized> Canonicalize for Box<T> {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        (**self).canonicalize(out);
    }
}

macro_rules! canonicalize_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Canonicalize),+> Canonicalize for ($($name,)+) {
            fn canonicalize(&self, out: &mut Vec<u8>) {
                out.push(b'[');
                $(
                    if $idx > 0 {
                        out.push(b',');
                    }
                    self.$idx.canonicalize(out);
                )+
                out.push(b']');
            }
        }
    };
}

canonicalize_tuple!(A: 0);
canonicalize_tuple!(A: 0, B: 1);
canonicalize_tuple!(A: 0, B: 1, C: 2);
canonicalize_tuple!(A: 0, B: 1, C: 2, D: 3);
canonicalize_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
canonicalize_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
