//! In-process key-value store.

use super::KvStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Store commands, used to target fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KvOp {
    RPush,
    LPop,
    Get,
    Set,
    Del,
    LLen,
    LRange,
    Ping,
}

impl std::fmt::Display for KvOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KvOp::RPush => "RPUSH",
            KvOp::LPop => "LPOP",
            KvOp::Get => "GET",
            KvOp::Set => "SET",
            KvOp::Del => "DEL",
            KvOp::LLen => "LLEN",
            KvOp::LRange => "LRANGE",
            KvOp::Ping => "PING",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Default)]
struct Inner {
    strings: HashMap<String, String>,
    lists: HashMap<String, VecDeque<String>>,
    failing: HashSet<KvOp>,
}

/// Key-value store held in process memory.
///
/// Every command takes one lock, so list pops are atomic across tasks the
/// same way they are on a real server. Commands listed via
/// [`fail_on`](MemoryStore::fail_on) return [`Error::Backend`] without
/// touching state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `op` fail until [`recover`](MemoryStore::recover).
    pub fn fail_on(&self, op: KvOp) {
        self.lock().failing.insert(op);
    }

    /// Clear all injected faults.
    pub fn recover(&self) {
        self.lock().failing.clear();
    }

    /// Whether a string value exists at `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().strings.contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock can't leave the maps half-updated,
        // every command is a single map operation.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn checked(&self, op: KvOp) -> Result<MutexGuard<'_, Inner>> {
        let guard = self.lock();
        if guard.failing.contains(&op) {
            return Err(Error::Backend(format!("injected {op} failure")));
        }
        Ok(guard)
    }
}

/// Resolve a Redis-style inclusive range against a list of `len` elements.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn rpush(&self, list: &str, value: &str) -> Result<u64> {
        let mut inner = self.checked(KvOp::RPush)?;
        let entries = inner.lists.entry(list.to_string()).or_default();
        entries.push_back(value.to_string());
        Ok(entries.len() as u64)
    }

    async fn lpop(&self, list: &str) -> Result<Option<String>> {
        let mut inner = self.checked(KvOp::LPop)?;
        let Some(entries) = inner.lists.get_mut(list) else {
            return Ok(None);
        };
        let head = entries.pop_front();
        if entries.is_empty() {
            inner.lists.remove(list);
        }
        Ok(head)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.checked(KvOp::Get)?;
        Ok(inner.strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.checked(KvOp::Set)?;
        inner.strings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let mut inner = self.checked(KvOp::Del)?;
        let removed = inner.strings.remove(key).is_some() || inner.lists.remove(key).is_some();
        Ok(u64::from(removed))
    }

    async fn llen(&self, list: &str) -> Result<u64> {
        let inner = self.checked(KvOp::LLen)?;
        Ok(inner.lists.get(list).map_or(0, |l| l.len() as u64))
    }

    async fn lrange(&self, list: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let inner = self.checked(KvOp::LRange)?;
        let Some(entries) = inner.lists.get(list) else {
            return Ok(Vec::new());
        };
        Ok(match resolve_range(entries.len(), start, stop) {
            Some((from, to)) => entries.range(from..=to).cloned().collect(),
            None => Vec::new(),
        })
    }

    async fn ping(&self) -> Result<()> {
        self.checked(KvOp::Ping)?;
        Ok(())
    }
}
