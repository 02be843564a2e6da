use crate::{
    Queryer, Result, ScanCollection, Scannable, Value,
    stream::{StreamExt, TryStreamExt},
    truncate_long,
};
use std::pin::pin;

/// Runs `sql` on `queryer` with `args` and appends one element of `dst` per
/// returned row, in row order.
///
/// `sql` is passed as-is, so the name of a prepared statement works as well.
/// Stops at the first error. The elements appended before the error stay in
/// `dst`, including the one whose row failed to scan.
///
/// ```rust,ignore
/// #[derive(Default, Scannable)]
/// struct Label {
///     id: i32,
///     name: String,
/// }
///
/// let mut labels = Vec::<Label>::new();
/// scan_all(
///     &mut connection,
///     "SELECT id, name FROM labels WHERE amount > $1",
///     &mut labels,
///     vec![10.as_value()],
/// )
/// .await?;
/// ```
pub async fn scan_all<Q, C>(
    queryer: &mut Q,
    sql: &str,
    dst: &mut C,
    args: Vec<Value>,
) -> Result<()>
where
    Q: Queryer,
    C: ScanCollection + ?Sized,
{
    let cursor = queryer.query(sql, args).await?;
    let mut cursor = pin!(cursor);
    let mut index = 0;
    while let Some(row) = cursor.try_next().await? {
        let element = dst.new_element();
        row.scan(&mut element.scan_targets()).map_err(|e| {
            let e = e.context(format!(
                "While scanning row {} of the query:\n{}",
                index,
                truncate_long!(sql)
            ));
            log::error!("{:#}", e);
            e
        })?;
        index += 1;
    }
    Ok(())
}

/// Scans the first row returned by `sql` into `dst`, ignoring the rest.
/// Returns whether a row was found; `dst` is untouched when it wasn't.
pub async fn scan_one<Q, S>(queryer: &mut Q, sql: &str, dst: &mut S, args: Vec<Value>) -> Result<bool>
where
    Q: Queryer,
    S: Scannable + ?Sized,
{
    let cursor = queryer.query(sql, args).await?;
    let mut cursor = pin!(cursor.take(1));
    let Some(row) = cursor.try_next().await? else {
        return Ok(false);
    };
    row.scan(&mut dst.scan_targets()).map_err(|e| {
        let e = e.context(format!(
            "While scanning the first row of the query:\n{}",
            truncate_long!(sql)
        ));
        log::error!("{:#}", e);
        e
    })?;
    Ok(true)
}
