mod failures;
mod labels;
mod prepared;
mod types;

use crate::{
    failures::failures, labels::labels, prepared::prepared, types::types,
};
use log::LevelFilter;
use pgscan::{Preparer, Queryer, scan_all};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs a statement producing no rows (DDL, plain inserts).
pub async fn run<Q: Queryer>(queryer: &mut Q, sql: &str) {
    scan_all(queryer, sql, &mut Vec::<()>::new(), vec![])
        .await
        .unwrap_or_else(|e| panic!("Failed to run `{sql}`: {e:#}"));
}

pub async fn execute_tests<C: Preparer + Queryer>(mut connection: C) {
    labels(&mut connection).await;
    prepared(&mut connection).await;
    failures(&mut connection).await;
    types(&mut connection).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
