//! Text rendering of arbitrary values
//!
//! Arguments, results and failures are persisted as text. Rendering is
//! total: a value whose formatting panics degrades to a placeholder naming
//! its type, so building a record can never fail.
//!
//! Types without a `Debug` impl can be passed through [`Opaque`], which
//! renders as `<TypeName>`.

use std::any::type_name;
use std::fmt::{self, Debug, Display};
use std::panic::{self, AssertUnwindSafe};

/// Render a value with its `Debug` representation
///
/// Falls back to [`placeholder`] if formatting panics.
pub fn render<T: ?Sized + Debug>(value: &T) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| format!("{:?}", value)))
        .unwrap_or_else(|_| placeholder::<T>())
}

/// Render a value with its `Display` representation
///
/// Falls back to [`placeholder`] if formatting panics.
pub fn render_display<T: ?Sized + Display>(value: &T) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| value.to_string()))
        .unwrap_or_else(|_| placeholder::<T>())
}

/// Placeholder text for a value of type `T` that could not be rendered
pub fn placeholder<T: ?Sized>() -> String {
    format!("<unrepresentable {}>", short_type_name(type_name::<T>()))
}

/// Strip module paths from a type name, keeping generic structure
///
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | '(' | ')' | '[' | ']' | ';' | '&' | ' ') {
            push_last_segment(&mut out, &full[start..i]);
            out.push(ch);
            start = i + ch.len_utf8();
        }
    }
    push_last_segment(&mut out, &full[start..]);
    out
}

fn push_last_segment(out: &mut String, path: &str) {
    out.push_str(path.rsplit("::").next().unwrap_or(path));
}

/// Derive a function name from the type name of a callable
///
/// Function items yield their own name (`app::jobs::sync` becomes `sync`).
/// Closures keep the enclosing function (`app::main::{{closure}}` becomes
/// `main::{{closure}}`). Function pointers and trait objects have no item
/// name; they yield their shortened type, e.g. `fn(i32) -> Result<i32, String>`
/// or `Box<dyn Fn(i32) -> Result<i32, String>>`.
pub fn function_name(full: &str) -> String {
    let full = full.trim_start_matches('&');
    let pointer = ["fn(", "unsafe ", "extern "].iter().any(|p| full.starts_with(p));
    if pointer || full.contains("dyn ") {
        return short_type_name(full);
    }
    let base = full.split('<').next().unwrap_or(full);
    let segments: Vec<&str> = base.split("::").collect();
    match segments.iter().rposition(|s| !s.starts_with("{{")) {
        Some(pos) => segments[pos..].join("::"),
        None => base.to_string(),
    }
}

/// Wrapper for values that have no text representation
///
/// Renders as `<TypeName>` so such values can still flow through an
/// instrumented call.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Opaque<T>(pub T);

impl<T> Opaque<T> {
    /// Unwrap the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Debug for Opaque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", short_type_name(type_name::<T>()))
    }
}
