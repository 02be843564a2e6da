use crate::ValueHolder;
use async_stream::try_stream;
use pgscan_core::{
    Error, Result, Row, RowLabeled, RowNames,
    stream::{BoxStream, StreamExt, TryStreamExt},
};
use std::{pin::pin, sync::Arc};
use tokio_postgres::RowStream;

pub(crate) fn row_to_pgscan_row(row: tokio_postgres::Row) -> Result<Row> {
    (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(e) => {
                let col = &row.columns()[i];
                Err(Error::new(e).context(format!(
                    "Could not decode column {} `{}`: {}",
                    i,
                    col.name(),
                    col.type_()
                )))
            }
        })
        .collect::<Result<Row>>()
}

/// Turns the rows of a portal into the cursor handed to callers. Errors
/// carry `context` and are logged before being yielded.
pub(crate) fn stream_postgres_rows(
    rows: RowStream,
    context: Arc<String>,
) -> BoxStream<'static, Result<RowLabeled>> {
    try_stream! {
        let mut rows = pin!(rows);
        let mut labels: Option<RowNames> = None;
        while let Some(row) = rows.next().await.transpose()? {
            let labels = labels.get_or_insert_with(|| {
                row.columns().iter().map(|c| c.name().to_string()).collect()
            });
            yield RowLabeled {
                labels: labels.clone(),
                values: row_to_pgscan_row(row)?,
            };
        }
    }
    .map_err(move |e: Error| {
        let e = e.context(context.clone());
        log::error!("{:#}", e);
        e
    })
    .boxed()
}
