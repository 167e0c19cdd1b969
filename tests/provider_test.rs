use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use swos_provider::config::Config;
use swos_provider::lifecycle::Provider;
use swos_provider::resources::PortConfig;
use swos_provider::switch::{JsonFile, PoeMode, Snapshot, Storage, StorageError, Switch};
use field_sync::{SyncError, Value};
use tempfile::TempDir;

// --- Test Storage ---

/// In-memory storage whose writes can be made to fail.
struct Flaky {
    stored: Snapshot,
    failing: Arc<AtomicBool>,
}

impl Storage for Flaky {
    fn load(&mut self) -> Result<Snapshot, StorageError> {
        Ok(self.stored.clone())
    }

    fn store(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("device unreachable".to_string()));
        }
        self.stored = snapshot.clone();
        Ok(())
    }
}

fn flaky(ports: usize) -> (Provider<Flaky>, Arc<AtomicBool>) {
    let failing = Arc::new(AtomicBool::new(false));
    let storage = Flaky {
        stored: Snapshot::factory(ports),
        failing: failing.clone(),
    };
    let switch = Switch::connect(storage).unwrap();
    (Provider::start(switch, 8).unwrap(), failing)
}

fn config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.device.snapshot_path = dir.path().join("switch.json");
    config.device.ports = 4;
    config
}

// --- Scenarios ---

#[tokio::test]
async fn test_create_with_defaults() {
    let (provider, _) = flaky(4);
    let port = provider.resource("port").unwrap();

    let created = port.create(json!({ "id": 3 })).await.unwrap();

    assert_eq!(
        created,
        json!({
            "id": 3,
            "name": "Port3",
            "enabled": true,
            "flow_control": false,
            "poe_out": "auto",
            "poe_priority": 1
        })
    );
    drop(port);
    let switch = provider.shutdown().await.unwrap();
    assert_eq!(switch.snapshot(), &Snapshot::factory(4));
}

#[tokio::test]
async fn test_update_override() {
    let (provider, _) = flaky(4);

    let updated = provider
        .apply("port", json!({ "id": 3, "name": "uplink" }))
        .await
        .unwrap();

    let updated: PortConfig = serde_json::from_value(updated).unwrap();
    assert_eq!(updated.name, Value::from("uplink"));
    assert_eq!(updated.enabled, Value::Known(true));

    let switch = provider.shutdown().await.unwrap();
    let (snapshot, storage) = switch.into_parts();
    assert_eq!(snapshot.links[2].name, "uplink");
    assert!(snapshot.links[2].enabled);
    assert_eq!(storage.stored, snapshot);
}

#[tokio::test]
async fn test_null_attribute_reads_from_device() {
    let (provider, _) = flaky(4);

    let updated = provider
        .apply("port", json!({ "id": 1, "name": null, "enabled": false }))
        .await
        .unwrap();

    assert_eq!(updated["name"], json!("Port1"));
    assert_eq!(updated["enabled"], json!(false));
    provider.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unmapped_poe_code_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let mut snapshot = Snapshot::factory(4);
    snapshot.links[0].poe_mode = PoeMode(9);
    JsonFile::new(&config.device.snapshot_path, 4)
        .store(&snapshot)
        .unwrap();

    let provider = Provider::open(&config).unwrap();
    let err = provider
        .resource("port")
        .unwrap()
        .read(json!({ "id": 1 }))
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, SyncError::Unrepresentable { ref field, .. } if field == "poe_out"));
    provider.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_apply_replaces_unmapped_poe_code() {
    let mut snapshot = Snapshot::factory(4);
    snapshot.links[0].poe_mode = PoeMode(9);
    let storage = Flaky {
        stored: snapshot,
        failing: Arc::new(AtomicBool::new(false)),
    };
    let provider = Provider::start(Switch::connect(storage).unwrap(), 8).unwrap();

    let applied = provider
        .apply(
            "port",
            json!({
                "id": 1,
                "name": "Port1",
                "enabled": true,
                "flow_control": false,
                "poe_out": "off",
                "poe_priority": 1
            }),
        )
        .await
        .unwrap();
    assert_eq!(applied["poe_out"], json!("off"));

    let switch = provider.shutdown().await.unwrap();
    assert_eq!(switch.snapshot().links[0].poe_mode, PoeMode::OFF);
}

#[tokio::test]
async fn test_save_failure_keeps_new_values_in_memory() {
    let (provider, failing) = flaky(4);
    failing.store(true, Ordering::SeqCst);

    let err = provider
        .apply("port", json!({ "id": 3, "name": "uplink" }))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to save config for port: device unreachable"
    );

    let port = provider.resource("port").unwrap();
    let current = port.read(json!({ "id": 3 })).await.unwrap();
    assert_eq!(current["name"], json!("uplink"));

    // A refresh drops what was never persisted.
    provider.refresh().await.unwrap();
    let current = port.read(json!({ "id": 3 })).await.unwrap();
    assert_eq!(current["name"], json!("Port3"));

    drop(port);
    provider.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_input_never_reaches_device() {
    let (provider, _) = flaky(4);

    let err = provider
        .apply("port", json!({ "id": 2, "poe_out": "sometimes" }))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value for port.poe_out: unknown value \"sometimes\", expected one of: off, auto, on, calib"
    );

    let err = provider
        .apply("port_vlan", json!({ "port": 2, "default_vlan_id": 5000 }))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = provider
        .apply("port", json!({ "id": 9 }))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to create port: invalid port id 9, valid ids are [1,4]"
    );

    let switch = provider.shutdown().await.unwrap();
    assert_eq!(switch.snapshot(), &Snapshot::factory(4));
}

#[tokio::test]
async fn test_vlan_lifecycle() {
    let (provider, _) = flaky(4);

    let created = provider
        .apply("vlan", json!({ "id": 20, "igmp_snooping": true }))
        .await
        .unwrap();
    assert_eq!(
        created,
        json!({ "id": 20, "independent_vlan_lookup": false, "igmp_snooping": true })
    );

    let updated = provider
        .apply("vlan", json!({ "id": 20, "independent_vlan_lookup": true }))
        .await
        .unwrap();
    assert_eq!(updated["igmp_snooping"], json!(true));
    assert_eq!(updated["independent_vlan_lookup"], json!(true));

    let vlan = provider.resource("vlan").unwrap();
    vlan.delete(json!({ "id": 20 })).await.unwrap();
    let err = vlan.read(json!({ "id": 20 })).await.unwrap_err();
    assert_eq!(err.to_string(), "unable to get vlan: vlan 20 not found");

    let err = vlan.delete(json!({ "id": 20 })).await.unwrap_err();
    assert!(matches!(err, SyncError::Delete { .. }));

    drop(vlan);
    let switch = provider.shutdown().await.unwrap();
    assert!(switch.snapshot().vlans.is_empty());
}

#[tokio::test]
async fn test_port_vlan_and_system() {
    let (provider, _) = flaky(4);

    let fwd = provider
        .apply(
            "port_vlan",
            json!({ "port": 2, "mode": "strict", "receive": "tagged", "header": "add_if_missing" }),
        )
        .await
        .unwrap();
    assert_eq!(
        fwd,
        json!({
            "port": 2,
            "mode": "strict",
            "receive": "tagged",
            "default_vlan_id": 1,
            "force_vlan_id": false,
            "header": "add_if_missing"
        })
    );

    let system = provider
        .apply("system", json!({ "identity": "core-sw" }))
        .await
        .unwrap();
    assert_eq!(system, json!({ "identity": "core-sw" }));

    let switch = provider.shutdown().await.unwrap();
    assert_eq!(switch.snapshot().system.identity, "core-sw");
    assert_eq!(switch.snapshot().forwarding[1].vlan_mode.0, 3);
    assert_eq!(switch.snapshot().forwarding[0], Snapshot::factory(4).forwarding[0]);
}

#[tokio::test]
async fn test_unknown_resource() {
    let (provider, _) = flaky(1);
    let err = provider.apply("bridge", json!({})).await.unwrap_err();
    assert_eq!(err.to_string(), "unknown resource bridge");
    provider.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_changes_survive_restart() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let provider = Provider::open(&config).unwrap();
    provider
        .apply("port", json!({ "id": 4, "name": "camera", "poe_out": "on" }))
        .await
        .unwrap();
    provider.shutdown().await.unwrap();

    let provider = Provider::open(&config).unwrap();
    let current = provider
        .resource("port")
        .unwrap()
        .read(json!({ "id": 4 }))
        .await
        .unwrap();
    assert_eq!(current["name"], json!("camera"));
    assert_eq!(current["poe_out"], json!("on"));
    provider.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_applies_share_one_session() {
    let (provider, _) = flaky(8);
    let provider = Arc::new(provider);

    let mut handles = Vec::new();
    for id in 1..=8 {
        let provider = provider.clone();
        handles.push(tokio::spawn(async move {
            provider
                .apply("port", json!({ "id": id, "name": format!("edge{id}") }))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let provider = Arc::try_unwrap(provider).ok().unwrap();
    let (snapshot, storage) = provider.shutdown().await.unwrap().into_parts();
    for (i, link) in snapshot.links.iter().enumerate() {
        assert_eq!(link.name, format!("edge{}", i + 1));
    }
    assert_eq!(storage.stored, snapshot);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_applies_of_new_vlan() {
    let (provider, _) = flaky(4);
    let provider = Arc::new(provider);

    for round in 0..20u16 {
        let id = 100 + round;
        let first = {
            let provider = provider.clone();
            tokio::spawn(async move {
                provider
                    .apply("vlan", json!({ "id": id, "igmp_snooping": true }))
                    .await
            })
        };
        let second = {
            let provider = provider.clone();
            tokio::spawn(async move {
                provider
                    .apply("vlan", json!({ "id": id, "independent_vlan_lookup": true }))
                    .await
            })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
    }

    let provider = Arc::try_unwrap(provider).ok().unwrap();
    let switch = provider.shutdown().await.unwrap();
    assert_eq!(switch.snapshot().vlans.len(), 20);
}
