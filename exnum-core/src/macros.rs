/// Construct an [`Exception`](crate::Exception) from a variant and any
/// number of `Display` parts.
///
/// ```
/// use exnum_core::{exception, AccessorOptions, Registry};
///
/// let registry = Registry::new();
/// let not_found = registry.accessor(AccessorOptions::default()).variant("NotFound");
/// let e = exception!(not_found, "user", 42, "missing");
/// assert_eq!(e.message(), "user 42 missing");
/// ```
#[macro_export]
macro_rules! exception {
    ($variant:expr $(, $part:expr)* $(,)?) => {{
        let __parts: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::string::ToString::to_string(&$part)),*];
        $variant.construct(__parts)
    }};
}

/// Construct an exception and raise it as a panic payload.
///
/// ```ignore
/// throw!(not_found, "user", id, "missing");
/// ```
#[macro_export]
macro_rules! throw {
    ($variant:expr $(, $part:expr)* $(,)?) => {{
        let __parts: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::string::ToString::to_string(&$part)),*];
        $variant.throw(__parts)
    }};
}

/// Early-return `Err` with an exception built from a variant and parts.
///
/// The error is converted with `Into`, so the enclosing function may return
/// any error type that an `Exception` converts into.
///
/// ```ignore
/// bail!(invalid_params, "limit must be positive, got", limit);
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:expr $(, $part:expr)* $(,)?) => {
        return ::std::result::Result::Err(::std::convert::Into::into(
            $crate::exception!($variant $(, $part)*),
        ))
    };
}
