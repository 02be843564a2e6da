use bytes::BytesMut;
use pgscan_core::Value;
use postgres_types::{FromSql, IsNull, ToSql, Type, to_sql_checked};
use rust_decimal::Decimal;
use std::{error::Error, io::Read};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Bridges `pgscan::Value` with the binary format of tokio-postgres, both
/// for decoding columns and for binding parameters.
#[derive(Debug)]
pub(crate) struct ValueHolder(pub(crate) Value);

impl From<Value> for ValueHolder {
    fn from(value: Value) -> Self {
        ValueHolder(value)
    }
}

impl<'a> FromSql<'a> for ValueHolder {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, Some(raw))
    }
    fn from_sql_null(ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, None)
    }
    fn from_sql_nullable(
        ty: &Type,
        raw: Option<&'a [u8]>,
    ) -> Result<Self, Box<dyn Error + Sync + Send>> {
        macro_rules! to_value {
            ($ty_var:ident, $raw:ident, $($($ty:path)|+ => ( $value:path, $source:ty ) ,)+) => {
                match *$ty_var {
                    $($($ty)|+ => $value(if let Some($raw) = $raw { Some(<$source>::from_sql($ty_var, $raw)?.into()) } else { None }),)+
                    _ => {
                        if let Some(mut raw) = $raw {
                            let mut buf = String::new();
                            let _ = raw.read_to_string(&mut buf);
                            return Err(pgscan_core::Error::msg(format!("Cannot decode sql type: `{}`, value: `{}`", $ty_var, buf)).into());
                        }
                        Value::Null
                    }
                }
            };
        }
        let value = to_value!(ty, raw,
            Type::BOOL => (Value::Boolean, bool),
            Type::CHAR => (Value::Int16, i8),
            Type::INT2 => (Value::Int16, i16),
            Type::INT4 => (Value::Int32, i32),
            Type::INT8 => (Value::Int64, i64),
            Type::OID => (Value::Int64, u32),
            Type::FLOAT4 => (Value::Float32, f32),
            Type::FLOAT8 => (Value::Float64, f64),
            Type::NUMERIC => (Value::Decimal, Decimal),
            Type::VARCHAR | Type::TEXT | Type::NAME | Type::BPCHAR | Type::UNKNOWN => (Value::Varchar, String),
            Type::BYTEA => (Value::Blob, Vec<u8>),
            Type::DATE => (Value::Date, Date),
            Type::TIME => (Value::Time, Time),
            Type::TIMESTAMP => (Value::Timestamp, PrimitiveDateTime),
            Type::TIMESTAMPTZ => (Value::TimestampWithTimezone, OffsetDateTime),
            Type::UUID => (Value::Uuid, Uuid),
        );
        Ok(value.into())
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

impl ToSql for ValueHolder {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>>
    where
        Self: Sized,
    {
        let value = self.0.clone().try_as(&postgres_type_to_value(ty))?;
        match (ty, &value) {
            (&Type::CHAR, Value::Int16(v)) => {
                return v.map(i8::try_from).transpose()?.to_sql(ty, out);
            }
            (&Type::OID, Value::Int64(v)) => {
                return v.map(u32::try_from).transpose()?.to_sql(ty, out);
            }
            _ => {}
        }
        match &value {
            Value::Null => None::<String>.to_sql(ty, out),
            Value::Boolean(v) => v.to_sql(ty, out),
            Value::Int16(v) => v.to_sql(ty, out),
            Value::Int32(v) => v.to_sql(ty, out),
            Value::Int64(v) => v.to_sql(ty, out),
            Value::Float32(v) => v.to_sql(ty, out),
            Value::Float64(v) => v.to_sql(ty, out),
            Value::Decimal(v) => v.to_sql(ty, out),
            Value::Varchar(v) => v.to_sql(ty, out),
            Value::Blob(v) => v.as_deref().to_sql(ty, out),
            Value::Date(v) => v.to_sql(ty, out),
            Value::Time(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => v.to_sql(ty, out),
            Value::TimestampWithTimezone(v) => v.to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool
    where
        Self: Sized,
    {
        true
    }

    to_sql_checked!();
}

/// The `Value` variant a parameter of type `ty` must be bound as. Unknown
/// types map to `Value::Null`, meaning "bind as is".
pub fn postgres_type_to_value(ty: &Type) -> Value {
    match *ty {
        Type::BOOL => Value::Boolean(None),
        Type::CHAR | Type::INT2 => Value::Int16(None),
        Type::INT4 => Value::Int32(None),
        Type::OID | Type::INT8 => Value::Int64(None),
        Type::FLOAT4 => Value::Float32(None),
        Type::FLOAT8 => Value::Float64(None),
        Type::NUMERIC => Value::Decimal(None),
        Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME => Value::Varchar(None),
        Type::BYTEA => Value::Blob(None),
        Type::DATE => Value::Date(None),
        Type::TIME => Value::Time(None),
        Type::TIMESTAMP => Value::Timestamp(None),
        Type::TIMESTAMPTZ => Value::TimestampWithTimezone(None),
        Type::UUID => Value::Uuid(None),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_follow_the_statement_types() {
        let mut out = BytesMut::new();
        let holder = ValueHolder(Value::Int32(Some(10)));
        holder.to_sql(&Type::INT8, &mut out).unwrap();
        assert_eq!(&out[..], &10i64.to_be_bytes());

        let mut out = BytesMut::new();
        let holder = ValueHolder(Value::Int64(Some(1 << 40)));
        assert!(holder.to_sql(&Type::INT4, &mut out).is_err());

        let mut out = BytesMut::new();
        let holder = ValueHolder(Value::Int32(None));
        assert!(matches!(
            holder.to_sql(&Type::TEXT, &mut out).unwrap(),
            IsNull::Yes
        ));
    }

    #[test]
    fn narrow_parameters() {
        let mut out = BytesMut::new();
        ValueHolder(Value::Int32(Some(65)))
            .to_sql(&Type::CHAR, &mut out)
            .unwrap();
        assert_eq!(&out[..], &[65]);

        let mut out = BytesMut::new();
        assert!(
            ValueHolder(Value::Int32(Some(300)))
                .to_sql(&Type::CHAR, &mut out)
                .is_err()
        );

        let mut out = BytesMut::new();
        ValueHolder(Value::Int32(Some(7)))
            .to_sql(&Type::OID, &mut out)
            .unwrap();
        assert_eq!(&out[..], &7u32.to_be_bytes());

        let mut out = BytesMut::new();
        assert!(
            ValueHolder(Value::Int64(Some(-1)))
                .to_sql(&Type::OID, &mut out)
                .is_err()
        );

        let mut out = BytesMut::new();
        assert!(matches!(
            ValueHolder(Value::Int16(None))
                .to_sql(&Type::OID, &mut out)
                .unwrap(),
            IsNull::Yes
        ));
    }

    #[test]
    fn decode_columns() {
        let value = ValueHolder::from_sql(&Type::INT4, &7i32.to_be_bytes()).unwrap();
        assert_eq!(value.0, Value::Int32(Some(7)));
        let value = ValueHolder::from_sql(&Type::TEXT, b"hello").unwrap();
        assert_eq!(value.0, Value::Varchar(Some("hello".into())));
        let value = ValueHolder::from_sql_null(&Type::UUID).unwrap();
        assert_eq!(value.0, Value::Uuid(None));
        assert!(ValueHolder::from_sql(&Type::JSONB, b"\x01{}").is_err());
    }
}
