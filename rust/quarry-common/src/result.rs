pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns an `InvalidArgument` error from the enclosing function when the
/// condition does not hold.
///
/// ```
/// use quarry_common::{Result, verify_arg};
///
/// fn chunks(size: usize) -> Result<usize> {
///     verify_arg!(size, size > 0);
///     Ok(size)
/// }
///
/// assert!(chunks(0).is_err());
/// ```
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        invalid_arg(name, condition)
    }
}

#[cold]
pub fn invalid_arg(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::Error::invalid_arg(
        name,
        format!("expected {condition}"),
    ))
}
