use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::{
    directives::ResultType,
    error::{Error, Result},
    wrapper::WRAPPER_TEMPLATE,
};

/// Layered key/value settings: built-in defaults, then `.dartbabelrc`, then
/// the environment.
#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(|l| l.ok()) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            } else {
                tracing::warn!(path = %config_path.display(), "config file exists but cannot be opened");
            }
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path: config_path.to_path_buf() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false)
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.is_empty()).map(PathBuf::from)
    }

    /// Result type used when the block does not say.
    pub fn default_result_type(&self) -> ResultType {
        self.get("DART_RESULT_TYPE")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// Resolve the settings one invocation needs.
    pub fn exec_config(&self) -> Result<ExecConfig> {
        let mut exec = ExecConfig::default();
        if let Some(cmd) = self.get("DART_COMMAND") {
            exec.command = cmd;
        }
        if let Some(path) = self.get_path("DART_WRAPPER_PATH") {
            exec.wrapper_template = fs::read_to_string(&path).map_err(|e| {
                Error::Configuration(format!(
                    "cannot read wrapper template {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }
        exec.keep_scratch = self.get_bool("DART_KEEP_SCRATCH");
        exec.scratch_dir = self.get_path("DART_SCRATCH_DIR");
        Ok(exec)
    }
}

/// Settings for a single invocation. Passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    /// Toolchain command; extra words become leading arguments.
    pub command: String,
    /// Wrapper used for snippets without their own `main`.
    pub wrapper_template: String,
    /// Leave the scratch program on disk after the run.
    pub keep_scratch: bool,
    /// Where scratch programs are created (system temp dir when unset).
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            command: "dart".into(),
            wrapper_template: WRAPPER_TEMPLATE.to_string(),
            keep_scratch: false,
            scratch_dir: None,
        }
    }
}

impl ExecConfig {
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "DART_COMMAND",
        "DART_WRAPPER_PATH",
        "DART_RESULT_TYPE",
        "DART_KEEP_SCRATCH",
        "DART_SCRATCH_DIR",
    ];

    KEYS.contains(&k) || k.starts_with("DART_BABEL_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("dart_babel").join(".dartbabelrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("DART_COMMAND".into(), "dart".into());
    m.insert("DART_RESULT_TYPE".into(), "value".into());
    m.insert("DART_KEEP_SCRATCH".into(), "false".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rc(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".dartbabelrc");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load_from(Path::new("/nonexistent/dart_babel/.dartbabelrc"));
        assert_eq!(cfg.default_result_type(), ResultType::Value);
        let exec = cfg.exec_config().unwrap();
        assert_eq!(exec.wrapper_template, WRAPPER_TEMPLATE);
        assert!(!exec.keep_scratch);
    }

    #[test]
    fn rc_file_overrides_defaults() {
        let (_dir, path) = rc("# comment\n\nDART_RESULT_TYPE = output\nDART_BABEL_FUTURE=1\n");
        let cfg = Config::load_from(&path);
        assert_eq!(cfg.get("DART_BABEL_FUTURE").as_deref(), Some("1"));
        if env::var("DART_RESULT_TYPE").is_err() {
            assert_eq!(cfg.default_result_type(), ResultType::Output);
        }
    }

    #[test]
    fn wrapper_path_is_loaded() {
        let (dir, path) = rc("");
        let wrapper = dir.path().join("wrapper.dart");
        fs::write(&wrapper, "void main() { %s }").unwrap();
        let mut cfg = Config::load_from(&path);
        cfg.set("DART_WRAPPER_PATH", wrapper.to_string_lossy());
        assert_eq!(cfg.exec_config().unwrap().wrapper_template, "void main() { %s }");
    }

    #[test]
    fn unreadable_wrapper_path_is_configuration_error() {
        let mut cfg = Config::load_from(Path::new("/nonexistent/.dartbabelrc"));
        cfg.set("DART_WRAPPER_PATH", "/nonexistent/wrapper.dart");
        let err = cfg.exec_config().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn keep_scratch_accepts_true_and_one() {
        let mut cfg = Config::load_from(Path::new("/nonexistent/.dartbabelrc"));
        cfg.set("DART_KEEP_SCRATCH", "TRUE");
        assert!(cfg.exec_config().unwrap().keep_scratch);
        cfg.set("DART_KEEP_SCRATCH", "1");
        assert!(cfg.exec_config().unwrap().keep_scratch);
        cfg.set("DART_KEEP_SCRATCH", "no");
        assert!(!cfg.exec_config().unwrap().keep_scratch);
    }
}
