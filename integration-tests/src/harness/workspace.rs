use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use switchyard_core::conf::{ConfigError, HttpConfig, load_config};
use switchyard_core::runtime::{ServerConfiguration, new_server_configuration_in};
use tempfile::TempDir;

/// Path of a file below `integration-tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// A temporary working directory holding a configuration file and the
/// files it references.
pub struct TestWorkspace {
    dir: TempDir,
    env: HashMap<String, String>,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
            env: HashMap::new(),
        }
    }

    /// A workspace whose configuration is copied from a fixture, together
    /// with the shared `public` directory.
    pub fn from_fixture(name: &str) -> Self {
        let ws = Self::new();
        let src = fs::read_to_string(fixture(name)).expect("failed to read fixture");
        ws.write("gateway.hcl", &src);

        fs::create_dir_all(ws.path().join("public")).expect("failed to create public dir");
        for entry in fs::read_dir(fixture("public")).expect("failed to read public fixtures") {
            let entry = entry.expect("failed to read fixture entry");
            fs::copy(entry.path(), ws.path().join("public").join(entry.file_name()))
                .expect("failed to copy fixture");
        }
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("gateway.hcl")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, content).expect("failed to write file");
        path
    }

    /// Sets a variable seen by the `SWITCHYARD_*` overrides only.
    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    /// Writes `src` as the configuration file and compiles it.
    pub fn compile_str(&self, src: &str) -> Result<ServerConfiguration, ConfigError> {
        self.write("gateway.hcl", src);
        self.compile()
    }

    pub fn compile(&self) -> Result<ServerConfiguration, ConfigError> {
        self.compile_with_port(None)
    }

    pub fn compile_with_port(&self, port: Option<u16>) -> Result<ServerConfiguration, ConfigError> {
        let conf = load_config(&self.config_path())?;
        let http = HttpConfig::from_settings(&conf.settings)
            .with_port(port)
            .update_by_env(|name| self.env.get(name).cloned())?;

        new_server_configuration_in(&conf, &http, self.path())
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
