#[cfg(test)]
mod tests {
    use pgscan::{AsValue, RowLabeled, ScanCollection, Scannable, Value};
    use std::borrow::Cow;

    fn row(labels: &[&str], values: Vec<Value>) -> RowLabeled {
        RowLabeled::new(
            labels.iter().map(|v| v.to_string()).collect(),
            values.into(),
        )
    }

    #[test]
    fn named_fields_in_declaration_order() {
        #[derive(Default, Debug, PartialEq, Scannable)]
        struct Label {
            name: String,
            id: i32,
            amount: Option<i64>,
        }

        let mut label = Label::default();
        assert_eq!(label.scan_targets().len(), 3);
        row(
            &["name", "id", "amount"],
            vec!["a".into(), 1i32.as_value(), Value::Int64(None)],
        )
        .scan(&mut label.scan_targets())
        .expect("Failed to scan the label");
        assert_eq!(
            label,
            Label {
                name: "a".into(),
                id: 1,
                amount: None,
            }
        );
    }

    #[test]
    fn skipped_fields() {
        #[derive(Default, Debug, Scannable)]
        struct Cached {
            id: i64,
            #[scan(skip)]
            hits: Cow<'static, str>,
            payload: Vec<u8>,
        }

        let mut items = Vec::<Cached>::new();
        let element = items.new_element();
        assert_eq!(element.scan_targets().len(), 2);
        row(
            &["id", "payload"],
            vec![7i64.as_value(), vec![1u8, 2, 3].as_value()],
        )
        .scan(&mut element.scan_targets())
        .expect("Failed to scan the cached item");
        assert_eq!(items[0].id, 7);
        assert_eq!(items[0].hits, "");
        assert_eq!(items[0].payload, [1, 2, 3]);
    }

    #[test]
    fn tuple_struct_and_generics() {
        #[derive(Default, Debug, PartialEq, Scannable)]
        struct Pair<T: AsValue>(T, Option<String>);

        let mut pair = Pair::<i16>::default();
        row(&["a", "b"], vec![Value::Int32(Some(12)), "b".into()])
            .scan(&mut pair.scan_targets())
            .expect("Failed to scan the pair");
        assert_eq!(pair, Pair(12, Some("b".into())));

        let error = row(&["a", "b"], vec![Value::Int32(Some(100_000)), Value::Null])
            .scan(&mut pair.scan_targets())
            .expect_err("100000 does not fit an i16");
        assert!(format!("{:#}", error).contains("column 0 `a`"));
    }
}
