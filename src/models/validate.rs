use crate::Error;

/// Fails if the value is empty or consists only of whitespace.
pub(crate) fn not_blank(value: &str, field: &'static str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::validation(field, "must not be blank"))
    } else {
        Ok(())
    }
}

/// Fails if the value is longer than `max` characters.
pub(crate) fn max_length(value: &str, max: usize, field: &'static str) -> Result<(), Error> {
    let len = value.chars().count();
    if len > max {
        Err(Error::validation(
            field,
            format!("is {} characters long, at most {} are allowed", len, max),
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn max_length_opt(
    value: Option<&str>,
    max: usize,
    field: &'static str,
) -> Result<(), Error> {
    value.map_or(Ok(()), |value| max_length(value, max, field))
}

pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| Error::validation(field, "is required"))
}
