use crate::{AsValue, Result, Value};
use std::collections::VecDeque;

/// An addressable destination receiving one column value.
pub trait ScanTarget {
    fn scan_value(&mut self, value: Value) -> Result<()>;
}

impl<T: AsValue> ScanTarget for T {
    fn scan_value(&mut self, value: Value) -> Result<()> {
        *self = T::try_from_value(value)?;
        Ok(())
    }
}

/// A type whose fields can be filled from one row.
///
/// `scan_targets` returns one target per expected column, in the same order
/// as the columns of the query. Usually derived with `#[derive(Scannable)]`.
pub trait Scannable {
    fn scan_targets(&mut self) -> Vec<&mut dyn ScanTarget>;
}

/// A caller owned collection that `scan_all` grows one element per row.
pub trait ScanCollection {
    /// Appends a fresh element and returns it for scanning.
    fn new_element(&mut self) -> &mut dyn Scannable;
}

impl<T: Scannable + Default> ScanCollection for Vec<T> {
    fn new_element(&mut self) -> &mut dyn Scannable {
        let index = self.len();
        self.push(T::default());
        &mut self[index]
    }
}

impl<T: Scannable + Default> ScanCollection for VecDeque<T> {
    fn new_element(&mut self) -> &mut dyn Scannable {
        let index = self.len();
        self.push_back(T::default());
        &mut self[index]
    }
}

macro_rules! impl_scannable_tuple {
    ($($name:ident: $index:tt),*) => {
        impl<$($name: AsValue),*> Scannable for ($($name,)*) {
            fn scan_targets(&mut self) -> Vec<&mut dyn ScanTarget> {
                vec![$(&mut self.$index as &mut dyn ScanTarget),*]
            }
        }
    };
}

impl Scannable for () {
    fn scan_targets(&mut self) -> Vec<&mut dyn ScanTarget> {
        Vec::new()
    }
}
impl_scannable_tuple!(A: 0);
impl_scannable_tuple!(A: 0, B: 1);
impl_scannable_tuple!(A: 0, B: 1, C: 2);
impl_scannable_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_scannable_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_scannable_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_scannable_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_scannable_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RowLabeled;

    fn row(values: Vec<Value>) -> RowLabeled {
        let labels = (0..values.len()).map(|i| format!("c{i}")).collect();
        RowLabeled::new(labels, values.into())
    }

    #[test]
    fn vec_grows_one_per_element() {
        let mut rows: Vec<(i32, String)> = Vec::new();
        for i in 0..3i32 {
            let element = rows.new_element();
            row(vec![i.as_value(), format!("n{i}").as_value()])
                .scan(&mut element.scan_targets())
                .unwrap();
        }
        assert_eq!(
            rows,
            vec![
                (0, "n0".to_string()),
                (1, "n1".to_string()),
                (2, "n2".to_string())
            ]
        );
    }

    #[test]
    fn partial_scan_keeps_leading_columns() {
        let mut rows: VecDeque<(i64, i32, Option<String>)> = VecDeque::new();
        let element = rows.new_element();
        let result = row(vec![
            Value::Int64(Some(7)),
            Value::Varchar(Some("x".into())),
            Value::Varchar(None),
        ])
        .scan(&mut element.scan_targets());
        assert!(result.is_err());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], (7, 0, None));
    }

    #[test]
    fn column_count_mismatch() {
        let mut target = (0i32,);
        let error = row(vec![Value::Int32(Some(1)), Value::Int32(Some(2))])
            .scan(&mut target.scan_targets())
            .unwrap_err();
        assert!(format!("{error}").contains("2 columns"));
        assert_eq!(target, (0,));
    }
}
