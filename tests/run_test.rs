use anyhow::Result;
use azinfra::cli::{CompileArgs, LogLevel, OutputFormat, StatusArgs, ValidateArgs};
use azinfra::{run_compile, run_status, run_validate};
use camino::Utf8PathBuf;
use tempfile::{TempDir, tempdir};

const MANIFEST: &str = r#"---
infrastructure:
  namespace: shoot--foo--bar
  name: bar
  region: westeurope
providerConfig:
  networks:
    vnet:
      name: existing
      resourceGroup: network-rg
    workers: 10.250.0.0/19
  zoned: false
cloudProfile:
  countFaultDomains:
  - region: westeurope
    count: 2
  countUpdateDomains:
  - region: westeurope
    count: 5
"#;

const CREDENTIALS: &str = r#"---
subscriptionID: subscription_id
tenantID: tenant_id
clientID: client_id
clientSecret: client_secret
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> Result<Utf8PathBuf> {
    let path = Utf8PathBuf::try_from(dir.path().join(name))?;
    std::fs::write(&path, content)?;
    Ok(path)
}

#[test]
fn test_run_compile_json() -> Result<()> {
    let dir = tempdir()?;
    let opts = CompileArgs {
        file: write_file(&dir, "infrastructure.yaml", MANIFEST)?,
        credentials: write_file(&dir, "credentials.yaml", CREDENTIALS)?,
        format: OutputFormat::Json,
        log_level: LogLevel::Info,
    };

    let rendered = run_compile(&opts)?;
    let tree: serde_json::Value = serde_json::from_str(&rendered)?;

    assert_eq!(tree["create"]["vnet"], false);
    assert_eq!(tree["create"]["availabilitySet"], true);
    assert_eq!(tree["azure"]["countFaultDomains"], 2);
    assert_eq!(tree["azure"]["countUpdateDomains"], 5);
    assert_eq!(tree["resourceGroup"]["vnet"]["resourceGroup"], "network-rg");
    assert_eq!(tree["clusterName"], "shoot--foo--bar");
    assert!(!rendered.contains("client_secret"));

    Ok(())
}

#[test]
fn test_run_compile_yaml() -> Result<()> {
    let dir = tempdir()?;
    let opts = CompileArgs {
        file: write_file(&dir, "infrastructure.yaml", MANIFEST)?,
        credentials: write_file(&dir, "credentials.yaml", CREDENTIALS)?,
        format: OutputFormat::Yaml,
        log_level: LogLevel::Info,
    };

    let rendered = run_compile(&opts)?;
    let tree: serde_yaml::Value = serde_yaml::from_str(&rendered)?;

    assert_eq!(tree["networks"]["worker"].as_str(), Some("10.250.0.0/19"));
    assert_eq!(tree["identity"]["enabled"].as_bool(), Some(false));

    Ok(())
}

#[test]
fn test_run_compile_missing_credentials() -> Result<()> {
    let dir = tempdir()?;
    let opts = CompileArgs {
        file: write_file(&dir, "infrastructure.yaml", MANIFEST)?,
        credentials: Utf8PathBuf::from("/non/existent/credentials.yaml"),
        format: OutputFormat::Yaml,
        log_level: LogLevel::Info,
    };

    let err = run_compile(&opts).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to load credentials"));

    Ok(())
}

#[test]
fn test_run_status() -> Result<()> {
    let dir = tempdir()?;
    let opts = StatusArgs {
        file: write_file(&dir, "infrastructure.yaml", MANIFEST)?,
        state: write_file(
            &dir,
            "terraform-output.json",
            r#"{
  "resourceGroupName": {"value": "shoot--foo--bar"},
  "vnetName": {"value": "existing"},
  "vnetResourceGroup": {"value": "network-rg"},
  "subnetName": {"value": "shoot--foo--bar-nodes"},
  "routeTableName": {"value": "worker_route_table"},
  "securityGroupName": {"value": "shoot--foo--bar-workers"},
  "availabilitySetID": {"value": "/subscriptions/s/resourceGroups/shoot--foo--bar/providers/Microsoft.Compute/availabilitySets/shoot--foo--bar-avset-workers"},
  "availabilitySetName": {"value": "shoot--foo--bar-avset-workers"}
}"#,
        )?,
        log_level: LogLevel::Info,
    };

    let rendered = run_status(&opts)?;
    let status: serde_json::Value = serde_json::from_str(&rendered)?;

    assert_eq!(status["kind"], "InfrastructureStatus");
    assert_eq!(status["networks"]["vnet"]["resourceGroup"], "network-rg");
    assert_eq!(status["availabilitySets"][0]["name"], "shoot--foo--bar-avset-workers");
    assert_eq!(status["zoned"], false);

    Ok(())
}

#[test]
fn test_run_status_rejects_malformed_state() -> Result<()> {
    let dir = tempdir()?;
    let opts = StatusArgs {
        file: write_file(&dir, "infrastructure.yaml", MANIFEST)?,
        state: write_file(&dir, "terraform-output.json", r#"{"vnetName": {"value": 1}}"#)?,
        log_level: LogLevel::Info,
    };

    let err = run_status(&opts).unwrap_err();
    assert!(format!("{:#}", err).contains("decode error"));

    Ok(())
}

#[test]
fn test_run_validate() -> Result<()> {
    let dir = tempdir()?;
    let opts = ValidateArgs {
        file: write_file(&dir, "infrastructure.yaml", MANIFEST)?,
        log_level: LogLevel::Info,
    };

    run_validate(&opts)?;

    Ok(())
}
