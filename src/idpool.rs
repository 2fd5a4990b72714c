//! Contiguous-block id allocation backed by the store's sequence.

use ::std::collections::VecDeque;

use log::debug;
use parking_lot::Mutex;

use super::store::{Store, StoreError};

/// Process-wide pool of pre-fetched row ids.
///
/// Ids come from the store's `id_seq` equivalent in contiguous blocks;
/// callers take them one at a time or a run of `n` ahead of a batch
/// insert. The pool refills under its mutex when short.
#[derive(Debug, Default)]
pub struct IdPool {
    pool: Mutex<VecDeque<i64>>,
}

impl IdPool {
    /// Empty pool; the first acquisition triggers a refill.
    pub fn new() -> IdPool {
        IdPool::default()
    }

    /// Take one id.
    pub fn next<S>(&self, store: &mut S) -> Result<i64, StoreError>
    where
        S: Store + ?Sized,
    {
        Ok(self.acquire(store, 1)?[0])
    }

    /// Take `n` ids, refilling from the store's sequence until enough
    /// are available.
    pub fn acquire<S>(&self, store: &mut S, n: usize) -> Result<Vec<i64>, StoreError>
    where
        S: Store + ?Sized,
    {
        let mut pool = self.pool.lock();
        while pool.len() < n {
            let (base, len) = store.next_id_block()?;
            if len <= 0 {
                return Err(StoreError::new("id sequence returned an empty block"));
            }
            debug!("refilling id pool with {base}..{}", base + len);
            pool.extend(base..base + len);
        }
        Ok(pool.drain(..n).collect())
    }
}
