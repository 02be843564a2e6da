use crate::{ValueHolder, util::stream_postgres_rows};
use openssl::ssl::{SslConnector, SslFiletype, SslMethod, SslVerifyMode};
use pgscan_core::{
    Context, Error, Preparer, Queryer, Result, RowLabeled, Value, stream::BoxStream,
    truncate_long,
};
use postgres_openssl::MakeTlsConnector;
use std::{collections::HashMap, env, path::Path, sync::Arc};
use tokio::spawn;
use tokio_postgres::{NoTls, Statement};
use url::Url;
use urlencoding::decode;

pub const POSTGRES_URL_PREFIX: &str = "postgres://";

/// Drives the connection half of a client until it closes.
fn spawn_connection<F>(connection: F)
where
    F: Future<Output = std::result::Result<(), tokio_postgres::Error>> + Send + 'static,
{
    spawn(async move {
        if let Err(e) = connection.await
            && !e.is_closed()
        {
            log::error!("Postgres connection error: {:#}", e);
        }
    });
}

/// A statement in the table along with the text it was prepared from.
struct NamedStatement {
    sql: String,
    statement: Statement,
}

/// A tokio-postgres client plus the table of statements prepared on it by
/// name.
///
/// Names registered through [`Preparer::prepare`] are resolved by
/// [`Queryer::query`]: passing a name as the SQL runs the statement it was
/// prepared for. Any other text is prepared on the fly.
pub struct PostgresConnection {
    pub(crate) client: tokio_postgres::Client,
    statements: HashMap<String, NamedStatement>,
}

impl PostgresConnection {
    /// Wraps an already connected client. The caller stays responsible for
    /// driving its connection future.
    pub fn new(client: tokio_postgres::Client) -> Self {
        Self {
            client,
            statements: HashMap::new(),
        }
    }

    /// Connects to `url`, which must start with `postgres://`.
    ///
    /// `sslmode`, `sslrootcert`, `sslcert` and `sslkey` are read from the
    /// query string, falling back to `PGSSLMODE`, `PGSSLROOTCERT`,
    /// `PGSSLCERT` and `PGSSLKEY`. The connection task is spawned on the
    /// current tokio runtime.
    pub async fn connect(url: &str) -> Result<PostgresConnection> {
        let context = || format!("While trying to connect to `{}`", url);
        let url = decode(url).with_context(context)?;
        if !url.starts_with(POSTGRES_URL_PREFIX) {
            let error = Error::msg(format!(
                "Postgres connection url must start with `{}`",
                POSTGRES_URL_PREFIX
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut url = Url::parse(&url).with_context(context)?;
        let mut take_url_param = |key: &str, env_var: &str| {
            let mut pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
            let value = pairs
                .iter()
                .position(|(k, _)| k == key)
                .map(|pos| pairs.remove(pos).1);
            if pairs.is_empty() {
                url.set_query(None);
            } else {
                url.query_pairs_mut()
                    .clear()
                    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            value.or_else(|| env::var(env_var).ok())
        };
        let sslmode = take_url_param("sslmode", "PGSSLMODE").unwrap_or("disable".into());
        let client = if sslmode == "disable" {
            let (client, connection) = tokio_postgres::connect(url.as_str(), NoTls)
                .await
                .with_context(context)?;
            spawn_connection(connection);
            client
        } else {
            let mut builder = SslConnector::builder(SslMethod::tls())?;
            if let Some(path) = take_url_param("sslrootcert", "PGSSLROOTCERT")
                .as_deref()
                .map(Path::new)
                && path.exists()
            {
                builder.set_ca_file(path)?;
            }
            if let Some(path) = take_url_param("sslcert", "PGSSLCERT")
                .as_deref()
                .map(Path::new)
                && path.exists()
            {
                builder.set_certificate_chain_file(path)?;
            }
            if let Some(path) = take_url_param("sslkey", "PGSSLKEY")
                .as_deref()
                .map(Path::new)
                && path.exists()
            {
                builder.set_private_key_file(path, SslFiletype::PEM)?;
            }
            match &*sslmode {
                "require" | "prefer" | "allow" => builder.set_verify(SslVerifyMode::NONE),
                _ => builder.set_verify(SslVerifyMode::PEER),
            }
            let connector = MakeTlsConnector::new(builder.build());
            let (client, connection) = tokio_postgres::connect(url.as_str(), connector)
                .await
                .with_context(context)?;
            spawn_connection(connection);
            client
        };
        Ok(Self::new(client))
    }

    /// The statement registered under `name`, if any.
    pub fn statement(&self, name: &str) -> Option<&Statement> {
        self.statements.get(name).map(|v| &v.statement)
    }

    /// Names of all the registered statements.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.statements.keys().map(String::as_str)
    }

    /// Forgets the statement registered under `name`. The server side
    /// statement is closed once no clone of it is alive.
    pub fn deallocate(&mut self, name: &str) -> bool {
        self.statements.remove(name).is_some()
    }

    pub fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }
}

impl Preparer for PostgresConnection {
    type Prepared = Statement;

    async fn prepare(&mut self, name: &str, sql: &str) -> Result<Statement> {
        let sql = sql.trim_end().trim_end_matches(';');
        if let Some(existing) = self.statements.get(name) {
            if existing.sql == sql {
                return Ok(existing.statement.clone());
            }
            return Err(Error::msg(format!(
                "The name `{}` is already taken by the statement:\n{}",
                name,
                truncate_long!(existing.sql)
            ))
            .context(format!("While preparing the query:\n{}", truncate_long!(sql))));
        }
        let statement = self.client.prepare(sql).await.with_context(|| {
            format!("While preparing the query:\n{}", truncate_long!(sql))
        })?;
        self.statements.insert(
            name.to_owned(),
            NamedStatement {
                sql: sql.to_owned(),
                statement: statement.clone(),
            },
        );
        Ok(statement)
    }
}

impl Queryer for PostgresConnection {
    type Cursor = BoxStream<'static, Result<RowLabeled>>;

    async fn query(&mut self, sql: &str, args: Vec<Value>) -> Result<Self::Cursor> {
        let context = Arc::new(format!("While running the query:\n{}", truncate_long!(sql)));
        let statement = match self.statements.get(sql) {
            Some(named) => named.statement.clone(),
            None => self
                .client
                .prepare(sql)
                .await
                .map_err(|e| Error::new(e).context(context.clone()))
                .inspect_err(|e| log::error!("{:#}", e))?,
        };
        let params = args.into_iter().map(ValueHolder).collect::<Vec<_>>();
        let rows = self
            .client
            .query_raw(&statement, params)
            .await
            .map_err(|e| Error::new(e).context(context.clone()))
            .inspect_err(|e| log::error!("{:#}", e))?;
        Ok(stream_postgres_rows(rows, context))
    }
}
