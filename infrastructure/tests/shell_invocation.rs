//! End-to-end tool invocations through the real shell runner

use runbook_application::{
    EnvironmentComposer, InMemorySecretStore, InheritedEnvironment, NoProgress, OutputMode,
    StepExecutor, ToolRegistry,
};
use runbook_domain::{Environment, InvocationError, ParameterValues, RunbookConfig};
use runbook_infrastructure::{RunbookLoader, ShellProcessRunner};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const MODES: [OutputMode; 2] = [OutputMode::Buffered, OutputMode::Streaming];

fn base_env() -> Environment {
    [("PATH", "/usr/local/bin:/usr/bin:/bin")]
        .into_iter()
        .collect()
}

fn registry(yaml: &str, store: InMemorySecretStore) -> ToolRegistry {
    let config: RunbookConfig = RunbookLoader::parse(yaml, Path::new("runbook.yaml")).unwrap();
    let composer = EnvironmentComposer::new(Arc::new(store))
        .with_inherited(InheritedEnvironment::Fixed(base_env()));
    let executor = StepExecutor::new(Arc::new(ShellProcessRunner::new()));
    ToolRegistry::from_config(&config, Arc::new(composer), Arc::new(executor))
}

fn args(pairs: &[(&str, &str)]) -> ParameterValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn sample_runbook(dir: &TempDir) -> String {
    format!(
        r#"
version: "1.0"
tools:
  - name: sample-tool
    cwd: {}
    steps:
      - name: Greeting
        command: echo Hello {{{{ name }}}}
      - name: List Project
        command: ls
    parameters:
      name:
        description: Who to greet
        default: World
"#,
        dir.path().display()
    )
}

#[tokio::test]
async fn test_sample_tool_in_both_modes() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "").unwrap();
    let registry = registry(&sample_runbook(&dir), InMemorySecretStore::new());
    let invoker = registry.get("sample-tool").unwrap();

    for mode in MODES {
        let output = invoker
            .invoke(ParameterValues::new(), mode, &NoProgress)
            .await
            .unwrap();
        assert_eq!(output, "Hello World\nmarker.txt");

        let output = invoker
            .invoke(args(&[("name", "Ann")]), mode, &NoProgress)
            .await
            .unwrap();
        assert_eq!(output, "Hello Ann\nmarker.txt");
    }

    // Identifier form through the CLI path
    let output = registry
        .run_direct("sample_tool", &["name=Ann".to_string()], &NoProgress)
        .await
        .unwrap();
    assert_eq!(output, "Hello Ann\nmarker.txt");
}

#[tokio::test]
async fn test_failing_step_stops_the_tool() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("second-ran");
    let yaml = format!(
        r#"
version: "1.0"
tools:
  - name: fail-fast
    steps:
      - name: Broken
        command: exit 3
      - name: Never
        command: touch {}
"#,
        marker.display()
    );
    let registry = registry(&yaml, InMemorySecretStore::new());
    let invoker = registry.get("fail-fast").unwrap();

    for mode in MODES {
        let err = invoker
            .invoke(ParameterValues::new(), mode, &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Step 1 failed: exit code 3");
        assert_eq!(err.step_index(), Some(1));
        assert!(!marker.exists());
    }
}

#[tokio::test]
async fn test_step_env_overrides_secret() {
    let yaml = r#"
version: "1.0"
tools:
  - name: layered
    secrets:
      - source: token
        target: TOKEN
    steps:
      - name: From secret
        command: echo $TOKEN
      - name: From step env
        command: echo $TOKEN
        env:
          TOKEN: stepval
"#;
    let store = InMemorySecretStore::new().with_secret("mcp-tools", "token", "secretval");
    let registry = registry(yaml, store);

    for mode in MODES {
        let output = registry
            .get("layered")
            .unwrap()
            .invoke(ParameterValues::new(), mode, &NoProgress)
            .await
            .unwrap();
        assert_eq!(output, "secretval\nstepval");
    }
}

#[tokio::test]
async fn test_timeout_does_not_wait_for_pipeline() {
    let yaml = r#"
version: "1.0"
tools:
  - name: slow
    timeout: 1
    steps:
      - name: Sleep
        command: sleep 5 | cat
"#;
    let registry = registry(yaml, InMemorySecretStore::new());
    let invoker = registry.get("slow").unwrap();

    for mode in MODES {
        let started = Instant::now();
        let err = invoker
            .invoke(ParameterValues::new(), mode, &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvocationError::Timeout {
                index: 1,
                seconds: 1,
                ..
            }
        ));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
