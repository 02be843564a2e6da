/// Shortens a long SQL text for error contexts and log lines.
#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::floor_char_boundary(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Largest char boundary of `value` not greater than `index`.
#[doc(hidden)]
pub fn floor_char_boundary(value: &str, index: usize) -> usize {
    if index >= value.len() {
        return value.len();
    }
    (0..=index)
        .rev()
        .find(|i| value.is_char_boundary(*i))
        .unwrap_or(0)
}
