use crate::constants::DEFAULT_NAMESPACE;
use crate::library::worker::{
    BoxedJobHandler, EngineConnection, JobRegistry, QueuedJob, WorkerEngine,
};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockEngineError {
    #[error("connection pool exhausted")]
    PoolExhausted,
    #[error("connection reset while flushing")]
    FlushFailed,
    #[error("unsupported command {0}")]
    UnsupportedCommand(String),
    #[error("wrong number of arguments for {0}")]
    Arity(String),
}

/// Hashes and sets written through the engine connections
#[derive(Default, Debug)]
pub struct MockStore {
    pub hashes: HashMap<String, BTreeMap<String, String>>,
    pub sets: HashMap<String, BTreeSet<String>>,
    pub flushes: usize,
}

impl MockStore {
    fn apply(&mut self, name: &str, args: &[String]) -> EmptyResult {
        match (name, args) {
            ("HSET", [key, field, value]) => {
                self.hashes
                    .entry(key.clone())
                    .or_default()
                    .insert(field.clone(), value.clone());
            }
            ("SADD", [key, member]) => {
                self.sets
                    .entry(key.clone())
                    .or_default()
                    .insert(member.clone());
            }
            ("SREM", [key, member]) => {
                if let Some(set) = self.sets.get_mut(key) {
                    set.remove(member);
                    if set.is_empty() {
                        self.sets.remove(key);
                    }
                }
            }
            ("DEL", [key]) => {
                self.hashes.remove(key);
                self.sets.remove(key);
            }
            ("HSET", _) | ("SADD", _) | ("SREM", _) | ("DEL", _) => {
                return Err(MockEngineError::Arity(name.to_string()).into())
            }
            _ => return Err(MockEngineError::UnsupportedCommand(name.to_string()).into()),
        }

        Ok(())
    }
}

pub struct MockConnection {
    pending: Vec<(String, Vec<String>)>,
    store: Arc<Mutex<MockStore>>,
    fail_flush: bool,
}

#[async_trait]
impl EngineConnection for MockConnection {
    fn queue_command(&mut self, name: &str, args: &[&str]) -> EmptyResult {
        let args = args.iter().map(|arg| arg.to_string()).collect();
        self.pending.push((name.to_string(), args));
        Ok(())
    }

    async fn flush(&mut self) -> EmptyResult {
        let pending = std::mem::take(&mut self.pending);

        if self.fail_flush {
            return Err(MockEngineError::FlushFailed.into());
        }

        let mut store = self.store.lock().unwrap();
        store.flushes += 1;

        for (name, args) in pending {
            store.apply(&name, &args)?;
        }

        Ok(())
    }
}

/// Worker engine keeping its store and queues in memory
///
/// The work loop processes every pushed job once and returns when the queues are empty.
pub struct MockWorkerEngine {
    namespace: String,
    store: Arc<Mutex<MockStore>>,
    registry: JobRegistry,
    jobs: Mutex<VecDeque<(String, QueuedJob)>>,
    failed: Mutex<Vec<(QueuedJob, String)>>,
    processed: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
    fail_acquire: AtomicBool,
    fail_flush: AtomicBool,
}

impl Default for MockWorkerEngine {
    fn default() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }
}

impl MockWorkerEngine {
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            store: Arc::new(Mutex::new(MockStore::default())),
            registry: JobRegistry::default(),
            jobs: Mutex::new(VecDeque::new()),
            failed: Mutex::new(Vec::new()),
            processed: AtomicUsize::new(0),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            fail_acquire: AtomicBool::new(false),
            fail_flush: AtomicBool::new(false),
        }
    }

    pub fn fail_acquire(&self, fail: bool) -> &Self {
        self.fail_acquire.store(fail, Ordering::SeqCst);
        self
    }

    pub fn fail_flush(&self, fail: bool) -> &Self {
        self.fail_flush.store(fail, Ordering::SeqCst);
        self
    }

    pub fn push_job(&self, queue: &str, job: QueuedJob) -> &Self {
        self.jobs
            .lock()
            .unwrap()
            .push_back((queue.to_string(), job));
        self
    }

    pub fn hash(&self, key: &str) -> Option<BTreeMap<String, String>> {
        self.store.lock().unwrap().hashes.get(key).cloned()
    }

    pub fn set(&self, key: &str) -> Option<BTreeSet<String>> {
        self.store.lock().unwrap().sets.get(key).cloned()
    }

    pub fn flushes(&self) -> usize {
        self.store.lock().unwrap().flushes
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn failed(&self) -> Vec<(QueuedJob, String)> {
        self.failed.lock().unwrap().clone()
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Number of connections acquired but not yet released
    pub fn outstanding_connections(&self) -> usize {
        self.acquired.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst)
    }

    pub fn acquired_connections(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkerEngine for MockWorkerEngine {
    type Connection = MockConnection;

    async fn init(&self) -> EmptyResult {
        Ok(())
    }

    async fn close(&self) {}

    async fn acquire_connection(&self) -> Result<Self::Connection, BoxedError> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(MockEngineError::PoolExhausted.into());
        }

        self.acquired.fetch_add(1, Ordering::SeqCst);

        Ok(MockConnection {
            pending: Vec::new(),
            store: self.store.clone(),
            fail_flush: self.fail_flush.load(Ordering::SeqCst),
        })
    }

    async fn release_connection(&self, _connection: Self::Connection) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn register_job_class(&self, class: String, handler: BoxedJobHandler) {
        self.registry.register(class, handler);
    }

    async fn run_work_loop(&self) -> EmptyResult {
        loop {
            let next = self.jobs.lock().unwrap().pop_front();

            let (queue, job) = match next {
                Some(entry) => entry,
                None => return Ok(()),
            };

            match self.registry.dispatch(&queue, job.clone()).await {
                Ok(_) => {
                    self.processed.fetch_add(1, Ordering::SeqCst);
                }
                Err(error) => self.failed.lock().unwrap().push((job, error.to_string())),
            }
        }
    }
}
