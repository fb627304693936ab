#![allow(clippy::unwrap_used)]
// Integration tests for branch provisioning using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vco_core::zscaler::ZSCALER_DEPLOYMENT_REF;
use vco_core::{
    BranchSpec, CoreError, Orchestrator, OrchestratorConfig, ProvisionContext, ProvisionOutcome,
    ProvisionPolicy, ProvisionStep, ProvisionedEdge, Provisioner, TlsVerification, WanUplink,
};

// ── Fixtures ────────────────────────────────────────────────────────

fn branch() -> BranchSpec {
    BranchSpec {
        name: "test edge 777".into(),
        country: "US".into(),
        postal_code: "62269".into(),
        contact_name: "Pat Doe".into(),
        contact_email: "pat@example.com".into(),
        transit_net: "10.0.0.0/30".parse().unwrap(),
        corporate_nets: vec!["172.16.10.0/24".parse().unwrap()],
        byod_net: "192.168.200.0/24".parse().unwrap(),
        guest_net: "192.168.201.0/24".parse().unwrap(),
        wans: [
            WanUplink {
                name: "ISP-A".into(),
                network: "172.16.0.0/30".parse().unwrap(),
                local: "172.16.0.2".parse().unwrap(),
                gateway: "172.16.0.1".parse().unwrap(),
                upstream_mbps: 50.0,
                downstream_mbps: 50.0,
                standby: false,
            },
            WanUplink {
                name: "ISP-B".into(),
                network: "172.16.0.4/30".parse().unwrap(),
                local: "172.16.0.6".parse().unwrap(),
                gateway: "172.16.0.5".parse().unwrap(),
                upstream_mbps: 50.0,
                downstream_mbps: 50.0,
                standby: false,
            },
        ],
    }
}

fn interface(name: &str) -> Value {
    let mut iface = json!({
        "name": name,
        "addressing": { "type": "DHCP" },
        "l2": { "probeInterval": "1" },
        "subinterfaces": [
            { "subinterfaceId": 11, "addressing": {} },
            { "subinterfaceId": 12, "addressing": {} }
        ]
    });
    if name == "GE2" {
        iface["cellular"] = json!({ "simPin": "" });
    }
    iface
}

fn device_settings(interfaces: &[&str]) -> Value {
    json!({
        "lan": { "networks": [{ "vlanId": 1, "cidrIp": "10.0.1.1" }] },
        "segments": [{ "routes": { "static": [] } }],
        "routedInterfaces": interfaces.iter().map(|n| interface(n)).collect::<Vec<_>>(),
        "zscaler": { "deployment": {} }
    })
}

fn stack(device_settings: Value) -> Value {
    json!([
        {
            "id": 1,
            "name": "Edge Specific",
            "modules": [
                { "id": 900, "name": "deviceSettings", "data": device_settings, "refs": {} },
                { "id": 901, "name": "WAN", "data": { "links": [] } }
            ]
        }
    ])
}

// ── Helpers ─────────────────────────────────────────────────────────

fn rpc_ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
}

async fn setup() -> (MockServer, Orchestrator) {
    let server = MockServer::start().await;
    let config = OrchestratorConfig {
        url: Url::parse(&server.uri()).unwrap(),
        token: SecretString::from("test-token".to_owned()),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
    };
    (server, Orchestrator::new(config).unwrap())
}

fn context(server: &MockServer, zscaler: Option<&str>) -> ProvisionContext {
    ProvisionContext {
        enterprise_logical_id: "ent-1".into(),
        profile_logical_id: "prof-1".into(),
        license_logical_id: "lic-1".into(),
        geocode_api_key: SecretString::from("maps-key".to_owned()),
        geocode_endpoint: Some(
            Url::parse(&format!("{}/maps/api/geocode/json", server.uri())).unwrap(),
        ),
        zscaler_subscription_logical_id: zscaler.map(str::to_owned),
        policy: ProvisionPolicy::default(),
    }
}

async fn mount_geocode(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{ "geometry": { "location": { "lat": 38.53, "lng": -89.91 } } }]
        })))
        .mount(server)
        .await;
}

async fn mount_create_edge(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/sdwan/v2/enterprises/ent-1/edges"))
        .and(body_partial_json(json!({
            "modelNumber": "edge6X0",
            "profile": "prof-1",
            "license": "lic-1",
            "haEnabled": true,
            "site": { "contactName": "Pat Doe", "lat": 38.53, "lon": -89.91 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "logicalId": "edge-lg-1",
            "_href": "/api/sdwan/v2/enterprises/ent-1/edges/edge-lg-1"
        })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_portal(server: &MockServer, rpc: &str, result: Value) {
    Mock::given(method("POST"))
        .and(path("/portal/"))
        .and(body_partial_json(json!({ "method": rpc })))
        .respond_with(rpc_ok(result))
        .mount(server)
        .await;
}

async fn module_updates(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/portal/")
        .filter_map(|r| r.body_json::<Value>().ok())
        .filter(|b| b["method"] == "configuration/updateConfigurationModule")
        .map(|b| b["params"].clone())
        .collect()
}

fn never_asked(_: &ProvisionedEdge) -> bool {
    panic!("operator should not be asked")
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_provisioning_flow() {
    let (server, orchestrator) = setup().await;
    mount_geocode(&server).await;
    mount_create_edge(&server, 1).await;
    mount_portal(
        &server,
        "enterprise/getEnterpriseEdges",
        json!([
            { "id": 17, "logicalId": "other" },
            { "id": 4321, "logicalId": "edge-lg-1", "name": "test edge 777" }
        ]),
    )
    .await;
    mount_portal(
        &server,
        "edge/getEdgeConfigurationStack",
        stack(device_settings(&["GE3", "GE2", "GE4"])),
    )
    .await;
    mount_portal(
        &server,
        "configuration/updateConfigurationModule",
        json!({ "rows": 1 }),
    )
    .await;

    let ctx = context(&server, None);
    let outcome = Provisioner::new(&orchestrator, &ctx)
        .run(&branch(), never_asked)
        .await;

    let ProvisionOutcome::Success {
        edge,
        completed,
        skipped,
    } = outcome
    else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(edge.logical_id, "edge-lg-1");
    assert_eq!(edge.edge_id, Some(4321));
    assert_eq!(
        edge.url,
        format!("{}/api/sdwan/v2/enterprises/ent-1/edges/edge-lg-1", server.uri())
    );
    assert!(completed.contains(&ProvisionStep::ReplaceWanOverlay));
    assert_eq!(skipped, [ProvisionStep::ConfigureZscaler]);

    let updates = module_updates(&server).await;
    assert_eq!(updates.len(), 2);

    assert_eq!(updates[0]["id"], 900);
    let ds = &updates[0]["_update"]["data"];
    let names: Vec<&str> = ds["routedInterfaces"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["GE2", "GE3", "GE4"]);
    assert!(ds["routedInterfaces"][0].get("cellular").is_none());
    assert_eq!(ds["routedInterfaces"][0]["addressing"]["cidrIp"], "10.0.0.1");
    assert_eq!(ds["routedInterfaces"][1]["addressing"]["gateway"], "172.16.0.1");
    assert_eq!(ds["segments"][0]["routes"]["static"][0]["gateway"], "10.0.0.2");
    assert_eq!(ds["lan"]["networks"][0]["cidrIp"], "169.254.255.255");

    assert_eq!(updates[1]["id"], 901);
    let links = updates[1]["_update"]["data"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["interfaces"], json!(["GE3"]));
    assert_eq!(links[1]["downstreamMbps"], "50");
}

#[tokio::test]
async fn test_missing_interface_is_partial_without_updates() {
    let (server, orchestrator) = setup().await;
    mount_geocode(&server).await;
    mount_create_edge(&server, 1).await;
    mount_portal(
        &server,
        "enterprise/getEnterpriseEdges",
        json!([{ "id": 4321, "logicalId": "edge-lg-1" }]),
    )
    .await;
    mount_portal(
        &server,
        "edge/getEdgeConfigurationStack",
        stack(device_settings(&["GE3", "GE2"])),
    )
    .await;

    let ctx = context(&server, None);
    let outcome = Provisioner::new(&orchestrator, &ctx)
        .run(&branch(), never_asked)
        .await;

    match outcome {
        ProvisionOutcome::PartiallyProvisioned {
            edge,
            completed,
            failed_step,
            reason,
        } => {
            assert_eq!(edge.logical_id, "edge-lg-1");
            assert_eq!(failed_step, ProvisionStep::PatchDeviceSettings);
            assert!(matches!(reason, CoreError::InterfaceNotFound { ref name } if name == "GE4"));
            assert!(completed.contains(&ProvisionStep::ResolveEdgeId));
        }
        other => panic!("expected partial outcome, got {other:?}"),
    }
    assert!(module_updates(&server).await.is_empty());
}

#[tokio::test]
async fn test_unknown_edge_is_partial() {
    let (server, orchestrator) = setup().await;
    mount_geocode(&server).await;
    mount_create_edge(&server, 1).await;
    mount_portal(&server, "enterprise/getEnterpriseEdges", json!([])).await;

    let ctx = context(&server, None);
    let outcome = Provisioner::new(&orchestrator, &ctx)
        .run(&branch(), never_asked)
        .await;

    assert!(matches!(
        outcome,
        ProvisionOutcome::PartiallyProvisioned {
            failed_step: ProvisionStep::ResolveEdgeId,
            reason: CoreError::EdgeNotFound { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_geocode_miss_creates_nothing() {
    let (server, orchestrator) = setup().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;
    mount_create_edge(&server, 0).await;

    let ctx = context(&server, None);
    let outcome = Provisioner::new(&orchestrator, &ctx)
        .run(&branch(), never_asked)
        .await;

    assert!(outcome.edge().is_none());
    assert!(matches!(
        outcome,
        ProvisionOutcome::Failed {
            failed_step: ProvisionStep::Geocode,
            reason: CoreError::Geocode { .. },
        }
    ));
}

#[tokio::test]
async fn test_zscaler_runs_after_confirmation() {
    let (server, orchestrator) = setup().await;
    mount_geocode(&server).await;
    mount_create_edge(&server, 1).await;
    mount_portal(
        &server,
        "enterprise/getEnterpriseEdges",
        json!([{ "id": 4321, "logicalId": "edge-lg-1" }]),
    )
    .await;
    mount_portal(
        &server,
        "edge/getEdgeConfigurationStack",
        stack(device_settings(&["GE2", "GE3", "GE4"])),
    )
    .await;
    mount_portal(
        &server,
        "configuration/updateConfigurationModule",
        json!({ "rows": 1 }),
    )
    .await;

    let ctx = context(&server, Some("zs-sub-1"));
    let mut asked = false;
    let outcome = Provisioner::new(&orchestrator, &ctx)
        .run(&branch(), |edge| {
            asked = true;
            edge.edge_id == Some(4321)
        })
        .await;

    assert!(asked);
    assert!(outcome.is_success(), "{outcome:?}");
    assert!(outcome.completed().contains(&ProvisionStep::ConfigureZscaler));

    let updates = module_updates(&server).await;
    assert_eq!(updates.len(), 3);
    let last = &updates[2];
    assert_eq!(last["id"], 900);
    assert_eq!(last["_update"]["data"]["zscaler"]["config"]["enabled"], true);
    assert_eq!(
        last["_update"]["refs"][ZSCALER_DEPLOYMENT_REF]["logicalId"],
        "zs-sub-1"
    );
}

#[tokio::test]
async fn test_declined_zscaler_is_skipped() {
    let (server, orchestrator) = setup().await;
    mount_geocode(&server).await;
    mount_create_edge(&server, 1).await;
    mount_portal(
        &server,
        "enterprise/getEnterpriseEdges",
        json!([{ "id": 4321, "logicalId": "edge-lg-1" }]),
    )
    .await;
    mount_portal(
        &server,
        "edge/getEdgeConfigurationStack",
        stack(device_settings(&["GE2", "GE3", "GE4"])),
    )
    .await;
    mount_portal(
        &server,
        "configuration/updateConfigurationModule",
        json!({ "rows": 1 }),
    )
    .await;

    let ctx = context(&server, Some("zs-sub-1"));
    let outcome = Provisioner::new(&orchestrator, &ctx)
        .run(&branch(), |_| false)
        .await;

    match outcome {
        ProvisionOutcome::Success { skipped, .. } => {
            assert_eq!(skipped, [ProvisionStep::ConfigureZscaler]);
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(module_updates(&server).await.len(), 2);
}
