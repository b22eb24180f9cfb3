use crate::domain::payment_request::{PaymentRequest, RequestId};
use crate::domain::ports::PaymentRequestStore;
use crate::error::{Result, SplitPayError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding one JSON document per payment request.
pub const CF_PAYMENT_REQUESTS: &str = "payment_requests";

/// A persistent store implementation using RocksDB.
///
/// Requests are keyed by the 16 bytes of their UUID. Writes that change an
/// existing request go through `write_lock`, so the version check and the
/// put form one step for every clone of the store.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "payment_requests" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_requests = ColumnFamilyDescriptor::new(CF_PAYMENT_REQUESTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_requests])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn requests_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_PAYMENT_REQUESTS).ok_or_else(|| {
            SplitPayError::InternalError(Box::new(std::io::Error::other(
                "Payment requests column family not found",
            )))
        })
    }

    fn read(&self, id: RequestId) -> Result<Option<PaymentRequest>> {
        let cf = self.requests_cf()?;
        match self.db.get_pinned_cf(cf, id.as_uuid().as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, request: &PaymentRequest) -> Result<()> {
        let cf = self.requests_cf()?;
        let value = serde_json::to_vec(request)?;
        self.db.put_cf(cf, request.id().as_uuid().as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl PaymentRequestStore for RocksDBStore {
    async fn insert(&self, request: PaymentRequest) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.read(request.id())?.is_some() {
            return Err(SplitPayError::InternalError(
                format!("Payment request {} already exists", request.id()).into(),
            ));
        }
        self.write(&request.with_version(0))
    }

    async fn get(&self, id: RequestId) -> Result<Option<PaymentRequest>> {
        self.read(id)
    }

    async fn replace(
        &self,
        request: PaymentRequest,
        expected_version: u64,
    ) -> Result<PaymentRequest> {
        let _guard = self.write_lock.lock().await;
        let current = self
            .read(request.id())?
            .ok_or(SplitPayError::RequestNotFound(request.id()))?;

        if current.version() != expected_version {
            return Err(SplitPayError::ConcurrencyConflict {
                request: request.id(),
                expected: expected_version,
                found: current.version(),
            });
        }

        let stored = request.with_version(expected_version + 1);
        self.write(&stored)?;
        Ok(stored)
    }

    async fn all_requests(&self) -> Result<Vec<PaymentRequest>> {
        let cf = self.requests_cf()?;
        let mut requests = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            requests.push(serde_json::from_slice(&value)?);
        }
        Ok(requests)
    }
}
