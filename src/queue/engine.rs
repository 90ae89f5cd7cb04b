//! Priority queue engine backed by redb
//!
//! Every mutation is a single redb write transaction; every size query is a
//! single read transaction. redb serialises writers process-wide, so the
//! engine adds no locking of its own. All calls block on file I/O, so async
//! code should run them on the blocking pool.

use crate::queue::bucket::{BucketTable, BucketWidth};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::key::{decode_key, wall_clock_nanos, KeyGenerator, KEY_LEN};
use crate::queue::message::Message;
use crate::queue::options::QueueOptions;
use log::{debug, info, trace};
use redb::{
    Database, ReadableTable, ReadableTableMetadata, TableDefinition, TableError, TableHandle,
};
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Store-wide settings; the name is outside the bucket namespace
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("prioq-meta");
const PRIORITIES_KEY: &str = "priorities";

/// Persistent priority queue
///
/// Messages are stored in one bucket per priority level `0..=max_priority`
/// and come back highest priority first, oldest first within a priority.
///
/// ```no_run
/// use prioq::queue::{Message, PriorityQueue};
///
/// # fn main() -> prioq::queue::QueueResult<()> {
/// let queue = PriorityQueue::open("/tmp/jobs.db", 3)?;
/// queue.enqueue(0, &Message::from("low"))?;
/// queue.enqueue(2, &Message::from("urgent"))?;
///
/// let first = queue.dequeue()?.expect("two messages queued");
/// assert_eq!(first.as_str(), Some("urgent"));
/// queue.close()?;
/// # Ok(())
/// # }
/// ```
pub struct PriorityQueue {
    database: Arc<Database>,
    // Set only when the engine created the database itself
    path: Option<PathBuf>,
    max_priority: u64,
    width: BucketWidth,
    approx_size: AtomicI64,
    keys: Arc<KeyGenerator>,
    retain_on_close: bool,
}

impl PriorityQueue {
    /// Open (or create) a queue file with `priorities` levels
    ///
    /// A path ending in a separator, or naming an existing directory, gets a
    /// generated file name `pq<unix-nanos>.db` inside that directory.
    pub fn open(path: impl AsRef<Path>, priorities: u64) -> QueueResult<Self> {
        Self::open_with(path, priorities, QueueOptions::default())
    }

    pub fn open_with(
        path: impl AsRef<Path>,
        priorities: u64,
        options: QueueOptions,
    ) -> QueueResult<Self> {
        max_priority_for(priorities)?;
        let path = resolve_queue_path(path.as_ref());
        let database = Database::create(&path).map_err(|err| QueueError::StorageOpen {
            path: path.clone(),
            source: err.into(),
        })?;

        let queue = Self::build(Arc::new(database), Some(path), priorities, options)?;
        info!(
            "Opened priority queue {} ({} priorities, {} messages stored)",
            queue.path().map(|p| p.display().to_string()).unwrap_or_default(),
            queue.priorities(),
            queue.approx_size()
        );
        Ok(queue)
    }

    /// Use an already opened database
    ///
    /// The caller keeps ownership of the file: closing the queue releases the
    /// handle but never deletes anything. Apart from the buckets the queue
    /// only adds its `prioq-meta` table; other tables are left alone.
    pub fn wrap(
        database: Arc<Database>,
        priorities: u64,
        options: QueueOptions,
    ) -> QueueResult<Self> {
        max_priority_for(priorities)?;
        let queue = Self::build(database, None, priorities, options)?;
        debug!(
            "Wrapped database as priority queue ({} priorities, {} messages stored)",
            queue.priorities(),
            queue.approx_size()
        );
        Ok(queue)
    }

    fn build(
        database: Arc<Database>,
        path: Option<PathBuf>,
        priorities: u64,
        mut options: QueueOptions,
    ) -> QueueResult<Self> {
        let adopt_stored = options.adopts_stored_priorities();
        let priorities = settle_priorities(&database, priorities, adopt_stored)?;
        let max_priority = max_priority_for(priorities)?;
        let queue = Self {
            database,
            path,
            max_priority,
            width: BucketWidth::for_max_priority(max_priority),
            approx_size: AtomicI64::new(0),
            keys: options.take_key_generator(),
            retain_on_close: options.retains_on_close(),
        };

        let (stored, newest_key) = queue.scan_stored()?;
        queue.approx_size.store(stored as i64, Ordering::Release);
        if let Some(newest_key) = newest_key {
            queue.keys.observe(newest_key);
        }
        Ok(queue)
    }

    /// Add a message at `priority` with a freshly generated key
    pub fn enqueue(&self, priority: u64, message: &Message) -> QueueResult<()> {
        self.enqueue_value(priority, message.value())
    }

    pub fn enqueue_value(&self, priority: u64, value: impl AsRef<[u8]>) -> QueueResult<()> {
        self.check_priority(priority)?;
        let key = self.keys.next_bytes();
        self.put(priority, &key, value.as_ref())
    }

    pub fn enqueue_string(&self, priority: u64, value: &str) -> QueueResult<()> {
        self.enqueue_value(priority, value.as_bytes())
    }

    /// Put a dequeued message back under its original key
    ///
    /// The message sorts before anything enqueued after it was first
    /// enqueued, even when requeued at a different priority.
    pub fn requeue(&self, priority: u64, message: &Message) -> QueueResult<()> {
        self.check_priority(priority)?;
        let key = message.key_bytes().ok_or(QueueError::RequeueWithoutKey)?;
        self.put(priority, key, message.value())
    }

    fn put(&self, priority: u64, key: &[u8; KEY_LEN], value: &[u8]) -> QueueResult<()> {
        let bucket = self.width.bucket_name(priority);
        let txn = self.database.begin_write()?;
        {
            let mut table = txn.open_table(BucketTable::new(&bucket))?;
            table.insert(&key[..], value)?;
        }
        txn.commit()?;

        self.approx_size.fetch_add(1, Ordering::AcqRel);
        trace!("Stored {} bytes in bucket {}", value.len(), bucket);
        Ok(())
    }

    /// Remove and return the head of the highest non-empty priority
    ///
    /// Returns `Ok(None)` when every bucket is empty; never waits for data.
    pub fn dequeue(&self) -> QueueResult<Option<Message>> {
        let txn = self.database.begin_write()?;
        let buckets = self.buckets(txn.list_tables()?);

        let mut head = None;
        for (priority, bucket) in buckets {
            let mut table = txn.open_table(BucketTable::new(&bucket))?;
            let popped = table
                .pop_first()?
                .map(|(key, value)| (key.value().to_vec(), value.value().to_vec()));
            if let Some((key, value)) = popped {
                head = Some((priority, key, value));
                break;
            }
        }

        let Some((priority, key, value)) = head else {
            txn.abort()?;
            return Ok(None);
        };
        let key: [u8; KEY_LEN] = key.as_slice().try_into().map_err(|_| QueueError::Internal {
            message: format!(
                "bucket {} holds a {}-byte key",
                self.width.bucket_name(priority),
                key.len()
            ),
        })?;
        txn.commit()?;

        self.approx_size.fetch_sub(1, Ordering::AcqRel);
        trace!("Dequeued {} bytes from priority {}", value.len(), priority);
        Ok(Some(Message::stored(key, value, priority)))
    }

    pub fn dequeue_value(&self) -> QueueResult<Option<Vec<u8>>> {
        Ok(self.dequeue()?.map(Message::into_value))
    }

    /// Dequeue and decode as UTF-8, replacing invalid sequences
    pub fn dequeue_string(&self) -> QueueResult<Option<String>> {
        Ok(self.dequeue()?.map(|msg| msg.to_string()))
    }

    /// Exact number of messages stored at `priority`
    pub fn size(&self, priority: u64) -> QueueResult<u64> {
        self.check_priority(priority)?;
        let bucket = self.width.bucket_name(priority);
        let txn = self.database.begin_read()?;
        let count = match txn.open_table(BucketTable::new(&bucket)) {
            Ok(table) => table.len()?,
            Err(TableError::TableDoesNotExist(_)) => 0,
            Err(err) => return Err(err.into()),
        };
        Ok(count)
    }

    /// Exact number of messages stored across all priorities
    pub fn total_size(&self) -> QueueResult<u64> {
        Ok(self.scan_stored()?.0)
    }

    /// `(priority, size)` of every non-empty bucket, highest priority first
    pub fn bucket_sizes(&self) -> QueueResult<Vec<(u64, u64)>> {
        let txn = self.database.begin_read()?;
        let mut sizes = Vec::new();
        for (priority, bucket) in self.buckets(txn.list_tables()?) {
            let count = txn.open_table(BucketTable::new(&bucket))?.len()?;
            if count > 0 {
                sizes.push((priority, count));
            }
        }
        Ok(sizes)
    }

    /// Running count kept by this engine; no transaction involved
    ///
    /// Exact whenever this engine is the only writer and no operation is in
    /// flight. Several engines sharing one file each keep their own count, so
    /// use [`total_size`](Self::total_size) when that matters.
    pub fn approx_size(&self) -> i64 {
        self.approx_size.load(Ordering::Acquire)
    }

    /// Release the store, deleting the backing file unless it is retained
    ///
    /// Queues created with [`wrap`](Self::wrap) never delete anything.
    pub fn close(self) -> QueueResult<()> {
        let Self {
            database,
            path,
            retain_on_close,
            ..
        } = self;
        drop(database);

        match path {
            Some(path) if !retain_on_close => {
                std::fs::remove_file(&path).map_err(|source| QueueError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!("Closed priority queue and removed {}", path.display());
            }
            Some(path) => info!("Closed priority queue {} (file retained)", path.display()),
            None => debug!("Released wrapped priority queue"),
        }
        Ok(())
    }

    pub fn max_priority(&self) -> u64 {
        self.max_priority
    }

    pub fn priorities(&self) -> u64 {
        self.max_priority.saturating_add(1)
    }

    /// Backing file, for queues that opened their own file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn retains_on_close(&self) -> bool {
        self.retain_on_close
    }

    pub fn bucket_width(&self) -> BucketWidth {
        self.width
    }

    fn check_priority(&self, priority: u64) -> QueueResult<()> {
        if priority > self.max_priority {
            return Err(QueueError::InvalidPriority {
                requested: priority,
                max: self.max_priority,
            });
        }
        Ok(())
    }

    /// Bucket tables present in the store, highest priority first
    fn buckets<H: TableHandle>(&self, tables: impl Iterator<Item = H>) -> Vec<(u64, String)> {
        let mut buckets: Vec<(u64, String)> = tables
            .filter_map(|table| {
                let name = table.name();
                self.width
                    .parse_bucket_name(name)
                    .filter(|priority| *priority <= self.max_priority)
                    .map(|priority| (priority, name.to_string()))
            })
            .collect();
        buckets.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        buckets
    }

    /// Total stored messages and the largest key seen, in one read transaction
    fn scan_stored(&self) -> QueueResult<(u64, Option<u64>)> {
        let txn = self.database.begin_read()?;
        let mut total = 0u64;
        let mut newest: Option<u64> = None;

        for (_, bucket) in self.buckets(txn.list_tables()?) {
            let table = txn.open_table(BucketTable::new(&bucket))?;
            total += table.len()?;
            let last = table.last()?;
            if let Some(key) = last.and_then(|(key, _)| decode_key(key.value())) {
                newest = Some(newest.map_or(key, |seen| seen.max(key)));
            }
        }
        Ok((total, newest))
    }
}

impl fmt::Debug for PriorityQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("path", &self.path)
            .field("max_priority", &self.max_priority)
            .field("width", &self.width)
            .field("approx_size", &self.approx_size())
            .field("retain_on_close", &self.retain_on_close)
            .finish()
    }
}

/// Record the priority count of a new store, or check it against a stored one
///
/// Buckets are named at a width derived from the count, so a store read with
/// a different count could miss every bucket.
fn settle_priorities(database: &Database, requested: u64, adopt_stored: bool) -> QueueResult<u64> {
    let txn = database.begin_write()?;
    let stored = {
        let mut table = txn.open_table(META_TABLE)?;
        let stored = table.get(PRIORITIES_KEY)?.map(|count| count.value());
        if stored.is_none() {
            table.insert(PRIORITIES_KEY, requested)?;
        }
        stored
    };

    match stored {
        None => {
            txn.commit()?;
            Ok(requested)
        }
        Some(stored) if stored == requested || adopt_stored => {
            txn.abort()?;
            if stored != requested {
                debug!("Using stored priority count {} instead of {}", stored, requested);
            }
            Ok(stored)
        }
        Some(stored) => {
            txn.abort()?;
            Err(QueueError::PriorityCountMismatch { stored, requested })
        }
    }
}

fn max_priority_for(priorities: u64) -> QueueResult<u64> {
    priorities
        .checked_sub(1)
        .ok_or(QueueError::InvalidPriorityRange { priorities })
}

/// Directory-style paths get a generated, unused file name
fn resolve_queue_path(path: &Path) -> PathBuf {
    let raw = path.as_os_str().to_string_lossy();
    let is_directory = raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR) || path.is_dir();
    if !is_directory {
        return path.to_path_buf();
    }

    let mut stamp = wall_clock_nanos();
    loop {
        let candidate = path.join(format!("pq{}.db", stamp));
        if !candidate.exists() {
            return candidate;
        }
        stamp += 1;
    }
}
