//! Key generation and keyspace namespacing.
//!
//! Every list and item key the crate touches is built here:
//!
//! | Key | Shape |
//! |-----|-------|
//! | queue list | `{keyspace}queue` |
//! | log list | `{keyspace}log` |
//! | task body | `{keyspace}{sha1-hex}` |
//! | result body | `{keyspace}{sha1-hex}-result` |

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

const QUEUE_LIST: &str = "queue";
const LOG_LIST: &str = "log";
const RESULT_SUFFIX: &str = "-result";

/// Key of a stored task body. Also the reference pushed onto the queue list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(String);

impl TaskKey {
    /// Wrap a raw key, e.g. one read back from the queue list.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the result record logged for this task.
    pub fn result_key(&self) -> String {
        format!("{}{RESULT_SUFFIX}", self.0)
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How task keys are derived on enqueue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Key is the hash of the payload. Identical payloads share one key
    /// and one stored body.
    #[default]
    ContentAddressed,
    /// Key is the hash of the payload plus a random salt, so identical
    /// payloads are stored and delivered separately.
    Salted,
}

impl std::fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KeyPolicy::ContentAddressed => "content_addressed",
            KeyPolicy::Salted => "salted",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content_addressed" => Ok(KeyPolicy::ContentAddressed),
            "salted" => Ok(KeyPolicy::Salted),
            other => Err(format!("unknown key policy: {other}")),
        }
    }
}

/// Prefix shared by every key of one logical queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyspace {
    prefix: String,
}

impl Keyspace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prepend the keyspace prefix.
    pub fn namespaced(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    pub fn queue_key(&self) -> String {
        self.namespaced(QUEUE_LIST)
    }

    pub fn log_key(&self) -> String {
        self.namespaced(LOG_LIST)
    }

    /// Content-addressed key for a serialized task.
    pub fn task_key(&self, serialized: &[u8]) -> TaskKey {
        TaskKey(self.namespaced(&sha1_hex(&[serialized])))
    }

    /// Key for a serialized task under the given policy.
    pub fn task_key_with(&self, serialized: &[u8], policy: KeyPolicy) -> TaskKey {
        match policy {
            KeyPolicy::ContentAddressed => self.task_key(serialized),
            KeyPolicy::Salted => {
                let salt = uuid::Uuid::new_v4();
                TaskKey(self.namespaced(&sha1_hex(&[serialized, salt.as_bytes().as_slice()])))
            }
        }
    }
}

fn sha1_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_key_is_prefixed_sha1_hex() {
        let keyspace = Keyspace::new("jobs:");
        // sha1("abc")
        assert_eq!(
            keyspace.task_key(b"abc").as_str(),
            "jobs:a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn list_keys_share_the_prefix() {
        let keyspace = Keyspace::new("jobs:");
        assert_eq!(keyspace.queue_key(), "jobs:queue");
        assert_eq!(keyspace.log_key(), "jobs:log");
        assert_eq!(Keyspace::default().queue_key(), "queue");
    }

    #[test]
    fn result_key_appends_suffix() {
        let key = TaskKey::new("jobs:abc");
        assert_eq!(key.result_key(), "jobs:abc-result");
    }

    #[test]
    fn salted_keys_differ_for_identical_payloads() {
        let keyspace = Keyspace::new("jobs:");
        let a = keyspace.task_key_with(b"{}", KeyPolicy::Salted);
        let b = keyspace.task_key_with(b"{}", KeyPolicy::Salted);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("jobs:"));
        assert_eq!(a.as_str().len(), "jobs:".len() + 40);
    }

    #[test]
    fn key_policy_parses_from_config_strings() {
        assert_eq!("salted".parse::<KeyPolicy>(), Ok(KeyPolicy::Salted));
        assert_eq!(
            "content_addressed".parse::<KeyPolicy>(),
            Ok(KeyPolicy::ContentAddressed)
        );
        assert!("random".parse::<KeyPolicy>().is_err());
    }
}
