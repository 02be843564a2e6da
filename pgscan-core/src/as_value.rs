use crate::{Error, Result, Value};
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used for query parameters and row decoding.
///
/// `try_from_value` accepts the canonical variant of the type and, where no
/// information is lost, a few neighbouring ones (narrower integers, integral
/// decimals). Range checks happen before any numeric conversion.
///
/// ```rust
/// use pgscan_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int32(Some(42)));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The typed `NULL` for `Self`.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn conversion_error<T>(value: &Value) -> Error {
    if value.is_null() {
        Error::msg(format!(
            "Cannot store NULL into {}, use Option<{}> instead",
            any::type_name::<T>(),
            any::type_name::<T>(),
        ))
    } else {
        Error::msg(format!(
            "Cannot convert {:?} to {}",
            value,
            any::type_name::<T>()
        ))
    }
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v.into()),
                    $($pat_rest => $expr_rest,)*
                    value => Err(conversion_error::<Self>(&value)),
                }
            }
        }
    };
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Int16(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::Int32(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::Int64(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::Decimal(Some(v)) if v.fract().is_zero() => {
                        v.to_i64().and_then(|v| <$source>::try_from(v).ok())
                    }
                    _ => None,
                };
                converted.ok_or_else(|| conversion_error::<Self>(&value))
            }
        }
    };
}

impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);

impl_as_value!(
    bool,
    Value::Boolean,
    Value::Int16(Some(v)) => Ok(v != 0),
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
);
impl_as_value!(
    f32,
    Value::Float32,
    Value::Int16(Some(v)) => Ok(v as f32),
);
impl_as_value!(
    f64,
    Value::Float64,
    Value::Float32(Some(v)) => Ok(v as f64),
    Value::Int16(Some(v)) => Ok(v as f64),
    Value::Int32(Some(v)) => Ok(v as f64),
    Value::Decimal(Some(v)) => v
        .to_f64()
        .ok_or_else(|| Error::msg(format!("Decimal {v} is out of range for f64"))),
);
impl_as_value!(
    Decimal,
    Value::Decimal,
    Value::Int16(Some(v)) => Ok(Decimal::from(v)),
    Value::Int32(Some(v)) => Ok(Decimal::from(v)),
    Value::Int64(Some(v)) => Ok(Decimal::from(v)),
    Value::Float32(Some(v)) => Decimal::from_f32(v)
        .ok_or_else(|| Error::msg(format!("Float {v} cannot be represented as Decimal"))),
    Value::Float64(Some(v)) => Decimal::from_f64(v)
        .ok_or_else(|| Error::msg(format!("Float {v} cannot be represented as Decimal"))),
);
impl_as_value!(String, Value::Varchar);
impl_as_value!(Box<[u8]>, Value::Blob);
impl_as_value!(Vec<u8>, Value::Blob);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);
impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
);
impl_as_value!(
    Uuid,
    Value::Uuid,
    Value::Varchar(Some(v)) => Uuid::parse_str(&v).map_err(|e| {
        Error::new(e).context(format!("While parsing `{v}` as Uuid"))
    }),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_narrow_with_range_check() {
        assert_eq!(i16::try_from_value(Value::Int64(Some(300))).unwrap(), 300);
        assert!(i16::try_from_value(Value::Int64(Some(70_000))).is_err());
        assert_eq!(i64::try_from_value(Value::Int16(Some(-2))).unwrap(), -2);
        assert_eq!(
            i32::try_from_value(Value::Decimal(Some(Decimal::from(12)))).unwrap(),
            12
        );
        assert!(i32::try_from_value(Value::Decimal(Some(Decimal::new(125, 1)))).is_err());
    }

    #[test]
    fn null_needs_option() {
        let error = i32::try_from_value(Value::Int32(None)).unwrap_err();
        assert!(format!("{error}").contains("Option<i32>"));
        assert_eq!(Option::<i32>::try_from_value(Value::Int32(None)).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(None::<String>.as_value(), Value::Varchar(None));
    }
}
