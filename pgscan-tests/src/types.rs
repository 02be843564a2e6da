use pgscan::{AsValue, Preparer, Queryer, Scannable, scan_one};
use rust_decimal::Decimal;
use time::{Date, Month, OffsetDateTime};
use uuid::Uuid;

pub async fn types<C: Preparer + Queryer>(connection: &mut C) {
    #[derive(Default, Debug, Scannable)]
    struct Everything {
        boolean: bool,
        small: i16,
        big: i64,
        double: f64,
        decimal: Decimal,
        text: String,
        blob: Vec<u8>,
        date: Option<Date>,
        timestamp: Option<OffsetDateTime>,
        uuid: Option<Uuid>,
        missing: Option<Uuid>,
    }

    let uuid = Uuid::new_v4();
    let mut row = Everything::default();
    let found = scan_one(
        connection,
        "SELECT
            true,
            2::INT2,
            $1::INT8,
            1.5::FLOAT8,
            12.34::NUMERIC,
            'text'::TEXT,
            '\\x0102'::BYTEA,
            '2024-01-31'::DATE,
            '2024-01-31 10:00:00+00'::TIMESTAMPTZ,
            $2::UUID,
            NULL::UUID",
        &mut row,
        vec![9_000_000_000i64.as_value(), uuid.as_value()],
    )
    .await
    .expect("Failed to scan every type");
    assert!(found);
    assert!(row.boolean);
    assert_eq!(row.small, 2);
    assert_eq!(row.big, 9_000_000_000);
    assert_eq!(row.double, 1.5);
    assert_eq!(row.decimal, Decimal::new(1234, 2));
    assert_eq!(row.text, "text");
    assert_eq!(row.blob, [1, 2]);
    assert_eq!(
        row.date,
        Some(Date::from_calendar_date(2024, Month::January, 31).expect("Valid date"))
    );
    assert_eq!(
        row.timestamp.map(|v| v.unix_timestamp()),
        Some(1_706_695_200)
    );
    assert_eq!(row.uuid, Some(uuid));
    assert_eq!(row.missing, None);

    // Parameters are converted to the type the statement expects
    let mut total = (0i64,);
    scan_one(
        connection,
        "SELECT $1::INT8 + $2::INT8",
        &mut total,
        vec![1i16.as_value(), 41i32.as_value()],
    )
    .await
    .expect("Failed to widen the parameters");
    assert_eq!(total, (42,));
}
