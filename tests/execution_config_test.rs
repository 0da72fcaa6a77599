use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use serde_json::{json, Value};

use volga_execution_config::api::options;
use volga_execution_config::{
    decode_submission, encode_submission, ConfigError, ExecutionConfig, InMemorySettingsAdapter,
    MirroredExecutionConfig, PARALLELISM_DEFAULT, PARALLELISM_UNKNOWN,
};

fn job_config() -> ExecutionConfig {
    let mut config = ExecutionConfig::new();
    config
        .set_parallelism(4)
        .set_max_parallelism(128)
        .set_auto_watermark_interval(500)
        .set_latency_tracking_interval(1_000)
        .set_task_cancellation_interval(10_000)
        .set_task_cancellation_timeout(0)
        .disable_generic_types()
        .enable_object_reuse()
        .register_pojo_type("org.example.Order")
        .set_use_snapshot_compression(true);
    config
}

#[test]
fn test_sentinel_constants() {
    assert_eq!(PARALLELISM_DEFAULT, -1);
    assert_eq!(PARALLELISM_UNKNOWN, -2);
    assert_eq!(ExecutionConfig::PARALLELISM_DEFAULT, PARALLELISM_DEFAULT);
    assert_eq!(ExecutionConfig::PARALLELISM_UNKNOWN, PARALLELISM_UNKNOWN);
}

#[test]
fn test_global_job_parameters_from_mixed_values() {
    let mut params: HashMap<&str, Value> = HashMap::new();
    params.insert("a", json!(1));
    params.insert("b", json!("x"));

    let mut config = ExecutionConfig::new();
    config.set_global_job_parameters(params);

    let expected: BTreeMap<String, String> = [("a", "1"), ("b", "x")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(config.get_global_job_parameters(), expected);
}

#[test]
fn test_same_setter_sequence_compares_equal() {
    assert_eq!(job_config(), job_config());

    let mut other = job_config();
    other.set_latency_tracking_interval(2_000);
    assert_ne!(job_config(), other);
}

#[test]
fn test_fail_late_validation() {
    let mut config = job_config();
    config.set_max_parallelism(2);
    assert_eq!(config.get_max_parallelism(), 2);

    match encode_submission("orders", &config) {
        Err(ConfigError::InvalidConfiguration { key, .. }) => assert_eq!(key, options::MAX_PARALLELISM),
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    }

    config.set_max_parallelism(4);
    let payload = decode_submission(&encode_submission("orders", &config).unwrap()).unwrap();
    assert_eq!(payload.execution_config, config);
}

#[test]
fn test_yaml_overlay_then_mirror() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "parallelism.default: 8\npipeline.max-parallelism: 64\npipeline.force-kryo: true").unwrap();

    let config = ExecutionConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.get_parallelism(), 8);
    assert!(config.is_force_kryo_enabled());
    config.validate().unwrap();

    let mut mirrored = MirroredExecutionConfig::with_config(config, InMemorySettingsAdapter::new()).unwrap();
    assert_eq!(mirrored.adapter().get(options::MAX_PARALLELISM), Some("64"));

    mirrored
        .update(|c| {
            c.disable_force_kryo();
        })
        .unwrap();
    assert_eq!(mirrored.adapter().get(options::FORCE_KRYO), Some("false"));

    mirrored.adapter_mut().overwrite(options::PARALLELISM, "16");
    assert_eq!(mirrored.current().unwrap().get_parallelism(), 16);

    let (config, _) = mirrored.into_parts();
    assert!(!config.is_force_kryo_enabled());
}

#[test]
fn test_serde_json_defaults_missing_fields() {
    let config: ExecutionConfig = serde_json::from_str(r#"{"parallelism": 3}"#).unwrap();
    assert_eq!(config.get_parallelism(), 3);
    assert_eq!(config.get_auto_watermark_interval(), 200);
    assert!(config.has_auto_generated_uids_enabled());
}
