use crate::{Error, Preparer, truncate_long};
use std::{
    borrow::Cow,
    env,
    fmt::{self, Display},
    str::FromStr,
    sync::{
        LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

/// Environment variable selecting the policy of the default namer.
pub const NAMING_POLICY_ENV: &str = "PGSCAN_STATEMENT_NAMING";

/// Prefix of sequential statement names unless configured otherwise.
pub const DEFAULT_STATEMENT_PREFIX: &str = "pgscan_stmt_";

/// How prepared statements get their names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingPolicy {
    /// The SQL text is the name.
    Identity,
    /// `prefix` followed by the decimal value of a counter.
    Sequential { prefix: Cow<'static, str> },
}

impl NamingPolicy {
    pub const fn sequential() -> Self {
        NamingPolicy::Sequential {
            prefix: Cow::Borrowed(DEFAULT_STATEMENT_PREFIX),
        }
    }

    /// Reads the policy from `PGSCAN_STATEMENT_NAMING`, falling back to the
    /// default when unset or invalid.
    pub fn from_env() -> Self {
        let Ok(value) = env::var(NAMING_POLICY_ENV) else {
            return Default::default();
        };
        value.parse().unwrap_or_else(|e: Error| {
            log::warn!("{:#}", e.context(format!("While reading `{NAMING_POLICY_ENV}`")));
            Default::default()
        })
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::sequential()
    }
}

impl FromStr for NamingPolicy {
    type Err = Error;

    /// Accepts `identity`, `sequential` and `sequential:<prefix>`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        match value.split_once(':') {
            None if value.eq_ignore_ascii_case("identity") => Ok(NamingPolicy::Identity),
            None if value.eq_ignore_ascii_case("sequential") => Ok(NamingPolicy::sequential()),
            Some((policy, prefix)) if policy.eq_ignore_ascii_case("sequential") => {
                if prefix.is_empty() {
                    return Err(Error::msg("The sequential naming prefix cannot be empty"));
                }
                Ok(NamingPolicy::Sequential {
                    prefix: prefix.to_owned().into(),
                })
            }
            _ => Err(Error::msg(format!(
                "Unknown statement naming policy `{value}`, expected `identity`, `sequential` or `sequential:<prefix>`"
            ))),
        }
    }
}

impl Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingPolicy::Identity => f.write_str("identity"),
            NamingPolicy::Sequential { prefix } => write!(f, "sequential:{prefix}"),
        }
    }
}

/// Failure to prepare a statement. Statements are prepared while the
/// application initializes, so callers are expected to treat this as fatal.
#[derive(Debug, thiserror::Error)]
#[error("pgscan: Prepare({sql}): {message}")]
pub struct FatalPrepareError {
    /// The name the statement would have been registered under.
    pub name: String,
    pub sql: String,
    message: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

/// Generates statement names and prepares statements under them.
///
/// The counter is atomic: concurrent callers never receive the same
/// sequential name. It starts at zero and advances on every call, including
/// the ones whose preparation fails.
///
/// Names are unique per namer only. Namers sharing a connection need
/// distinct prefixes; a preparer refuses a name already registered for a
/// different statement. Use [`must_prepare`] to draw from the process wide
/// [`DEFAULT_NAMER`].
#[derive(Debug)]
pub struct StatementNamer {
    policy: NamingPolicy,
    counter: AtomicU64,
}

impl StatementNamer {
    pub const fn new(policy: NamingPolicy) -> Self {
        Self {
            policy,
            counter: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> &NamingPolicy {
        &self.policy
    }

    /// Number of sequential names handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn next_name(&self, sql: &str) -> String {
        match &self.policy {
            NamingPolicy::Identity => sql.to_owned(),
            NamingPolicy::Sequential { prefix } => {
                let n = self.counter.fetch_add(1, Ordering::Relaxed);
                format!("{prefix}{n}")
            }
        }
    }

    /// Prepares `sql` under a fresh name and returns the name.
    pub async fn prepare<P: Preparer>(
        &self,
        preparer: &mut P,
        sql: &str,
    ) -> Result<String, FatalPrepareError> {
        let name = self.next_name(sql);
        match preparer.prepare(&name, sql).await {
            Ok(..) => {
                log::debug!("Prepared `{}` as:\n{}", name, truncate_long!(sql));
                Ok(name)
            }
            Err(e) => {
                let error = FatalPrepareError {
                    name,
                    sql: sql.to_owned(),
                    message: e.root_cause().to_string(),
                    source: e.into(),
                };
                log::error!("{}", error);
                Err(error)
            }
        }
    }

    /// Like [`StatementNamer::prepare`] but panics when the statement cannot
    /// be prepared. Meant for initialization code holding statement names in
    /// long lived state.
    pub async fn must_prepare<P: Preparer>(&self, preparer: &mut P, sql: &str) -> String {
        match self.prepare(preparer, sql).await {
            Ok(name) => name,
            Err(e) => panic!("{}", e),
        }
    }
}

/// Process wide namer used by [`must_prepare`], configured from
/// `PGSCAN_STATEMENT_NAMING` the first time it is used.
pub static DEFAULT_NAMER: LazyLock<StatementNamer> =
    LazyLock::new(|| StatementNamer::new(NamingPolicy::from_env()));

/// Prepares `sql` on `preparer` under a name generated by [`DEFAULT_NAMER`]
/// and returns the name, which can be passed back as the SQL of a query.
///
/// # Panics
/// When the statement cannot be prepared. The message carries the SQL text
/// and the driver error.
pub async fn must_prepare<P: Preparer>(preparer: &mut P, sql: &str) -> String {
    DEFAULT_NAMER.must_prepare(preparer, sql).await
}
