#![allow(dead_code)]

use pgscan_core::{
    Error, Preparer, Queryer, Result, RowLabeled, RowNames, ScanTarget, Scannable, Value,
    stream::Stream,
};
use std::{
    collections::{HashMap, VecDeque},
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    task::{Context, Poll},
};

pub fn init_logs() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Warn)
        .try_init();
}

pub enum Step {
    Row(Vec<Value>),
    Fail(&'static str),
}

struct Script {
    labels: RowNames,
    steps: Vec<Step>,
}

/// In memory stand-in for a driver connection. Statements are registered
/// by name, queries replay a script keyed by the resolved SQL text.
#[derive(Default)]
pub struct MockConnection {
    prepared: HashMap<String, String>,
    scripts: HashMap<String, Script>,
    pub released: Arc<AtomicUsize>,
    pub queries: Vec<(String, Vec<Value>)>,
}

impl MockConnection {
    pub fn with_result(mut self, sql: &str, labels: &[&str], steps: Vec<Step>) -> Self {
        self.scripts.insert(
            sql.into(),
            Script {
                labels: labels.iter().map(|v| v.to_string()).collect(),
                steps,
            },
        );
        self
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn is_prepared(&self, name: &str) -> bool {
        self.prepared.contains_key(name)
    }
}

impl Preparer for MockConnection {
    type Prepared = String;

    async fn prepare(&mut self, name: &str, sql: &str) -> Result<String> {
        let context = || format!("While preparing the query:\n{sql}");
        if let Some(existing) = self.prepared.get(name) {
            if existing == sql {
                return Ok(name.into());
            }
            return Err(Error::msg(format!("The name `{name}` is already taken")).context(context()));
        }
        if sql.contains("INVALID") {
            return Err(Error::msg("syntax error at or near \"INVALID\"").context(context()));
        }
        self.prepared.insert(name.into(), sql.into());
        Ok(name.into())
    }
}

impl Queryer for MockConnection {
    type Cursor = MockCursor;

    async fn query(&mut self, sql: &str, args: Vec<Value>) -> Result<MockCursor> {
        let text = self.prepared.get(sql).map(String::as_str).unwrap_or(sql);
        self.queries.push((text.into(), args));
        let Some(script) = self.scripts.get(text) else {
            return Err(Error::msg(format!("relation in `{text}` does not exist")));
        };
        let steps = script
            .steps
            .iter()
            .map(|step| match step {
                Step::Row(values) => Step::Row(values.clone()),
                Step::Fail(message) => Step::Fail(*message),
            })
            .collect();
        Ok(MockCursor {
            labels: script.labels.clone(),
            steps,
            released: self.released.clone(),
        })
    }
}

pub struct MockCursor {
    labels: RowNames,
    steps: VecDeque<Step>,
    released: Arc<AtomicUsize>,
}

impl Stream for MockCursor {
    type Item = Result<RowLabeled>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(match self.steps.pop_front() {
            Some(Step::Row(values)) => Some(Ok(RowLabeled::new(
                self.labels.clone(),
                values.into(),
            ))),
            Some(Step::Fail(message)) => {
                self.steps.clear();
                Some(Err(Error::msg(message)))
            }
            None => None,
        })
    }
}

impl Drop for MockCursor {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Label {
    pub id: i32,
    pub name: String,
}

impl Label {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Scannable for Label {
    fn scan_targets(&mut self) -> Vec<&mut dyn ScanTarget> {
        vec![&mut self.id as &mut dyn ScanTarget, &mut self.name]
    }
}
