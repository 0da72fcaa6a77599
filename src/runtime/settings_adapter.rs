use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use tracing::debug;

use crate::api::error::ConfigResult;
use crate::api::execution_config::ExecutionConfig;
use crate::api::options::ALL_KEYS;

/// Narrow view of an external runtime's configuration store.
pub trait SettingsAdapter {
    fn apply_setting(&mut self, key: &str, value: &str) -> Result<()>;
    fn read_setting(&self, key: &str) -> Result<Option<String>>;
}

/// Map-backed adapter, used when the runtime lives in the same process (and in tests).
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsAdapter {
    settings: HashMap<String, String>,
    applied: usize,
}

impl InMemorySettingsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `apply_setting` calls received so far.
    pub fn applied_count(&self) -> usize {
        self.applied
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Changes a value on the runtime side without going through the mirrored holder.
    pub fn overwrite(&mut self, key: &str, value: &str) {
        self.settings.insert(key.to_string(), value.to_string());
    }
}

impl SettingsAdapter for InMemorySettingsAdapter {
    fn apply_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.applied += 1;
        self.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn read_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self.settings.get(key).cloned())
    }
}

/// An `ExecutionConfig` whose mutations are forwarded to a runtime through a
/// [`SettingsAdapter`], and whose reads are refreshed from it.
pub struct MirroredExecutionConfig<A: SettingsAdapter> {
    config: ExecutionConfig,
    adapter: A,
}

impl<A: SettingsAdapter> MirroredExecutionConfig<A> {
    pub fn new(adapter: A) -> ConfigResult<Self> {
        Self::with_config(ExecutionConfig::default(), adapter)
    }

    /// Pushes every setting of `config` to the adapter.
    pub fn with_config(config: ExecutionConfig, mut adapter: A) -> ConfigResult<Self> {
        for (key, value) in config.to_settings() {
            adapter.apply_setting(&key, &value)?;
        }
        debug!("Mirrored full execution config to runtime");
        Ok(Self { config, adapter })
    }

    /// Runs `f` against a copy of the local holder and forwards the settings it changed.
    /// The local holder takes the new state only once the runtime accepted every change.
    pub fn update<F>(&mut self, f: F) -> ConfigResult<&mut Self>
    where
        F: FnOnce(&mut ExecutionConfig),
    {
        let mut next = self.config.clone();
        f(&mut next);

        let before = self.config.to_settings();
        let after = next.to_settings();
        for (key, value) in changed_settings(&before, &after) {
            debug!("Forwarding execution config setting {}={}", key, value);
            self.adapter.apply_setting(key, value)?;
        }
        self.config = next;
        Ok(self)
    }

    /// Refreshes the local holder from the runtime and returns it.
    pub fn current(&mut self) -> ConfigResult<&ExecutionConfig> {
        let mut overlay = BTreeMap::new();
        for key in ALL_KEYS {
            if let Some(value) = self.adapter.read_setting(key)? {
                overlay.insert(key.to_string(), value);
            }
        }
        self.config.configure(&overlay)?;
        Ok(&self.config)
    }

    /// The last local snapshot, without asking the runtime.
    pub fn local(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_parts(self) -> (ExecutionConfig, A) {
        (self.config, self.adapter)
    }
}

fn changed_settings<'a>(
    before: &BTreeMap<String, String>,
    after: &'a BTreeMap<String, String>,
) -> Vec<(&'a str, &'a str)> {
    after
        .iter()
        .filter(|(k, v)| before.get(*k) != Some(*v))
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::options;
    use anyhow::bail;

    #[test]
    fn test_new_pushes_every_setting() {
        let mirrored = MirroredExecutionConfig::new(InMemorySettingsAdapter::new()).unwrap();
        assert_eq!(mirrored.adapter().applied_count(), ALL_KEYS.len());
        assert_eq!(mirrored.adapter().get(options::PARALLELISM), Some("-1"));
    }

    #[test]
    fn test_update_forwards_only_changes() {
        let mut mirrored = MirroredExecutionConfig::new(InMemorySettingsAdapter::new()).unwrap();
        let baseline = mirrored.adapter().applied_count();

        mirrored
            .update(|c| {
                c.set_parallelism(4).enable_object_reuse();
            })
            .unwrap();
        assert_eq!(mirrored.adapter().applied_count(), baseline + 2);
        assert_eq!(mirrored.adapter().get(options::PARALLELISM), Some("4"));
        assert_eq!(mirrored.adapter().get(options::OBJECT_REUSE), Some("true"));

        // no-op update
        mirrored
            .update(|c| {
                c.set_parallelism(4);
            })
            .unwrap();
        assert_eq!(mirrored.adapter().applied_count(), baseline + 2);
    }

    #[test]
    fn test_current_reads_runtime_overrides() {
        let mut mirrored = MirroredExecutionConfig::new(InMemorySettingsAdapter::new()).unwrap();
        mirrored.adapter_mut().overwrite(options::MAX_PARALLELISM, "512");
        assert_eq!(mirrored.local().get_max_parallelism(), -1);
        assert_eq!(mirrored.current().unwrap().get_max_parallelism(), 512);
        assert_eq!(mirrored.local().get_max_parallelism(), 512);
    }

    #[test]
    fn test_bad_runtime_value_keeps_local_copy() {
        let mut mirrored = MirroredExecutionConfig::new(InMemorySettingsAdapter::new()).unwrap();
        let before = mirrored.local().clone();
        mirrored.adapter_mut().overwrite(options::LATENCY_TRACKING_INTERVAL, "999");
        mirrored.adapter_mut().overwrite(options::PARALLELISM, "bad");

        assert!(mirrored.current().is_err());
        assert_eq!(mirrored.local(), &before);
        assert_eq!(mirrored.local().get_latency_tracking_interval(), 0);
    }

    /// Accepts `remaining` calls, then rejects every further one.
    struct FlakyAdapter {
        inner: InMemorySettingsAdapter,
        remaining: usize,
    }

    impl SettingsAdapter for FlakyAdapter {
        fn apply_setting(&mut self, key: &str, value: &str) -> Result<()> {
            if self.remaining == 0 {
                bail!("runtime rejected {key}");
            }
            self.remaining -= 1;
            self.inner.apply_setting(key, value)
        }

        fn read_setting(&self, key: &str) -> Result<Option<String>> {
            self.inner.read_setting(key)
        }
    }

    #[test]
    fn test_failed_forward_keeps_local_copy() {
        let adapter = FlakyAdapter {
            inner: InMemorySettingsAdapter::new(),
            remaining: ALL_KEYS.len() + 1,
        };
        let mut mirrored = MirroredExecutionConfig::new(adapter).unwrap();
        let before = mirrored.local().clone();

        let result = mirrored.update(|c| {
            c.set_parallelism(4).enable_object_reuse();
        });
        assert!(result.is_err());
        assert_eq!(mirrored.local(), &before);
        assert_eq!(mirrored.local().get_parallelism(), -1);
        assert!(!mirrored.local().is_object_reuse_enabled());
        assert_eq!(mirrored.adapter().inner.applied_count(), ALL_KEYS.len() + 1);
    }

    struct FailingAdapter;

    impl SettingsAdapter for FailingAdapter {
        fn apply_setting(&mut self, key: &str, _value: &str) -> Result<()> {
            bail!("runtime rejected {key}")
        }

        fn read_setting(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn test_adapter_failures_propagate() {
        let err = MirroredExecutionConfig::new(FailingAdapter).err().unwrap();
        assert!(matches!(err, crate::api::error::ConfigError::Adapter(_)));
    }
}
