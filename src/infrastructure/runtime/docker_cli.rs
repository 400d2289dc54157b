use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tokio::process::Command;

use crate::application::ports::{ContainerRuntime, ContainerSpec, RuntimeError};

/// Container runtime that drives the Docker Engine API through curl over
/// the daemon's unix socket.
///
/// Matches how the manager is deployed: the container carries curl but no
/// Docker client, and the socket is bind-mounted in.
pub struct DockerCliRuntime {
    socket: String,
    api_version: String,
}

impl DockerCliRuntime {
    pub fn new(socket: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            socket: socket.into(),
            api_version: api_version.into(),
        }
    }

    async fn engine_post(&self, path: &str, body: Option<String>) -> Result<(), RuntimeError> {
        let url = format!("http://localhost/{}/{}", self.api_version, path);

        let mut command = Command::new("curl");
        command
            .arg("--silent")
            .arg("--show-error")
            .arg("--fail")
            .arg("--unix-socket")
            .arg(&self.socket)
            .arg("-X")
            .arg("POST");
        if let Some(body) = body {
            command
                .arg("-H")
                .arg("Content-Type: application/json")
                .arg("-d")
                .arg(body);
        }
        command.arg(&url);

        let output = command
            .output()
            .await
            .map_err(|err| RuntimeError::Unavailable(err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RuntimeError::CommandFailed(format!("{url}: {stderr}")));
        }

        tracing::debug!(%url, "engine call succeeded");
        Ok(())
    }
}

/// Engine `containers/create` body for one bot container
fn create_body(spec: &ContainerSpec) -> Value {
    let port_key = format!("{}/tcp", spec.port);

    let mut exposed = Map::new();
    exposed.insert(port_key.clone(), json!({}));

    let mut bindings = Map::new();
    bindings.insert(port_key, json!([{ "HostPort": spec.port.to_string() }]));

    let bind = format!(
        "{}:/usr/src/app/strategies/{}.js",
        spec.strategy_path, spec.name
    );
    let env: Vec<String> = spec
        .env
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();

    json!({
        "Image": spec.image,
        "ExposedPorts": exposed,
        "HostConfig": {
            "Binds": [bind],
            "NetworkMode": spec.network,
            "PortBindings": bindings,
        },
        "Env": env,
    })
}

#[async_trait]
impl ContainerRuntime for DockerCliRuntime {
    async fn create(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        let body = create_body(spec).to_string();
        self.engine_post(&format!("containers/create?name={}", spec.name), Some(body))
            .await
    }

    async fn start(&self, name: &str) -> Result<(), RuntimeError> {
        self.engine_post(&format!("containers/{name}/start"), None)
            .await
    }
}
