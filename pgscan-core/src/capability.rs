use crate::{Result, RowLabeled, Value, stream::Stream};
use std::future::Future;

/// Something able to compile SQL text into a named, reusable statement.
///
/// Implemented by driver connections. The statement table is owned by the
/// implementor: a name registered here must be accepted as the `sql`
/// argument of [`Queryer::query`] on the same connection. Preparing a name
/// again with the same SQL text is allowed, with a different text it is an
/// error and the registered statement is kept.
pub trait Preparer: Send {
    /// Driver handle of a prepared statement.
    type Prepared: Send;

    fn prepare(
        &mut self,
        name: &str,
        sql: &str,
    ) -> impl Future<Output = Result<Self::Prepared>> + Send;
}

/// Something able to run a query and hand back its rows.
pub trait Queryer: Send {
    /// Forward-only, single use stream of rows. A terminal failure of the
    /// result set is delivered as the last item. Dropping it releases the
    /// underlying driver resources.
    type Cursor: Stream<Item = Result<RowLabeled>> + Send;

    /// Runs `sql` (SQL text or the name of a prepared statement) binding
    /// `args` positionally.
    fn query(
        &mut self,
        sql: &str,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<Self::Cursor>> + Send;
}

impl<P: Preparer> Preparer for &mut P {
    type Prepared = P::Prepared;

    fn prepare(
        &mut self,
        name: &str,
        sql: &str,
    ) -> impl Future<Output = Result<Self::Prepared>> + Send {
        (**self).prepare(name, sql)
    }
}

impl<Q: Queryer> Queryer for &mut Q {
    type Cursor = Q::Cursor;

    fn query(
        &mut self,
        sql: &str,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<Self::Cursor>> + Send {
        (**self).query(sql, args)
    }
}
