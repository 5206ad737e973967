use std::path::{Path, PathBuf};

use crate::error::ImportError;

/// Name of the optional per-project config file.
pub const CONFIG_FILE_NAME: &str = "legacy-archive.toml";

const ENV_ASSET_DIR: &str = "LEGACY_ARCHIVE_ASSET_DIR";
const ENV_PUBLIC_PREFIX: &str = "LEGACY_ARCHIVE_PUBLIC_PREFIX";
const ENV_CONTENT_DIR: &str = "LEGACY_ARCHIVE_CONTENT_DIR";
const ENV_VIDEOS_FILE: &str = "LEGACY_ARCHIVE_VIDEOS_FILE";
const ENV_MANIFEST: &str = "LEGACY_ARCHIVE_MANIFEST";
const ENV_REPORT: &str = "LEGACY_ARCHIVE_REPORT";

const DEFAULT_ASSET_DIR: &str = "public/assets/source/legacy-archive";
const DEFAULT_PUBLIC_PREFIX: &str = "/assets/source/legacy-archive";
const DEFAULT_CONTENT_DIR: &str = "src/content";
const DEFAULT_VIDEOS_FILE: &str = "src/content/videos/videos.json";
const DEFAULT_MANIFEST: &str = "scripts/import-manifest.json";
const DEFAULT_REPORT: &str = "scripts/import_report.md";

/// Filesystem locations an import run reads and writes.
///
/// Relative paths from the environment or the config file are taken relative
/// to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub project_root: PathBuf,
    /// Where downloaded assets are written.
    pub asset_dir: PathBuf,
    /// Site-relative URL prefix under which `asset_dir` is served.
    pub public_prefix: String,
    /// Root of the content collections (`books/`, `press/`, ...).
    pub content_dir: PathBuf,
    pub videos_file: PathBuf,
    pub manifest_file: PathBuf,
    pub report_file: PathBuf,
}

/// Where a config value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the project config file.
    ConfigFile,
    /// Built-in default.
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Provenance of each config field.
#[derive(Debug)]
pub struct ConfigSources {
    pub asset_dir: ConfigSource,
    pub public_prefix: ConfigSource,
    pub content_dir: ConfigSource,
    pub videos_file: ConfigSource,
    pub manifest_file: ConfigSource,
    pub report_file: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    paths: Option<PathsConfig>,
}

#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
struct PathsConfig {
    asset_dir: Option<String>,
    public_prefix: Option<String>,
    content_dir: Option<String>,
    videos_file: Option<String>,
    manifest_file: Option<String>,
    report_file: Option<String>,
}

impl ImportConfig {
    /// Built-in layout for a project rooted at `project_root`.
    pub fn defaults(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            asset_dir: project_root.join(DEFAULT_ASSET_DIR),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            content_dir: project_root.join(DEFAULT_CONTENT_DIR),
            videos_file: project_root.join(DEFAULT_VIDEOS_FILE),
            manifest_file: project_root.join(DEFAULT_MANIFEST),
            report_file: project_root.join(DEFAULT_REPORT),
            project_root,
        }
    }

    /// Load the config for `project_root`.
    ///
    /// Priority: env vars > config file > defaults. A config file that exists
    /// but does not parse is an error.
    pub fn load(project_root: &Path) -> Result<Self, ImportError> {
        let paths = load_config_file(project_root)?;
        Ok(Self::resolve(project_root, &paths, |var| std::env::var(var).ok()))
    }

    fn resolve(
        project_root: &Path,
        paths: &PathsConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let pick = |var: &str, file: &Option<String>, default: &str| -> String {
            env(var)
                .or_else(|| file.clone())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            project_root: project_root.to_path_buf(),
            asset_dir: project_root.join(pick(ENV_ASSET_DIR, &paths.asset_dir, DEFAULT_ASSET_DIR)),
            public_prefix: pick(ENV_PUBLIC_PREFIX, &paths.public_prefix, DEFAULT_PUBLIC_PREFIX),
            content_dir: project_root.join(pick(
                ENV_CONTENT_DIR,
                &paths.content_dir,
                DEFAULT_CONTENT_DIR,
            )),
            videos_file: project_root.join(pick(
                ENV_VIDEOS_FILE,
                &paths.videos_file,
                DEFAULT_VIDEOS_FILE,
            )),
            manifest_file: project_root.join(pick(
                ENV_MANIFEST,
                &paths.manifest_file,
                DEFAULT_MANIFEST,
            )),
            report_file: project_root.join(pick(ENV_REPORT, &paths.report_file, DEFAULT_REPORT)),
        }
    }
}

/// Path of the config file for a project.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Determine where each config field is coming from.
pub fn config_sources(project_root: &Path) -> ConfigSources {
    let paths = load_config_file(project_root).unwrap_or_default();
    sources_for(&paths, |var| std::env::var(var).is_ok())
}

fn sources_for(paths: &PathsConfig, env_set: impl Fn(&str) -> bool) -> ConfigSources {
    let source = |var: &'static str, file: &Option<String>| {
        if env_set(var) {
            ConfigSource::EnvVar(var)
        } else if file.is_some() {
            ConfigSource::ConfigFile
        } else {
            ConfigSource::Default
        }
    };

    ConfigSources {
        asset_dir: source(ENV_ASSET_DIR, &paths.asset_dir),
        public_prefix: source(ENV_PUBLIC_PREFIX, &paths.public_prefix),
        content_dir: source(ENV_CONTENT_DIR, &paths.content_dir),
        videos_file: source(ENV_VIDEOS_FILE, &paths.videos_file),
        manifest_file: source(ENV_MANIFEST, &paths.manifest_file),
        report_file: source(ENV_REPORT, &paths.report_file),
    }
}

fn load_config_file(project_root: &Path) -> Result<PathsConfig, ImportError> {
    let path = config_path(project_root);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PathsConfig::default()),
        Err(e) => return Err(e.into()),
    };
    let config: ConfigFile = toml::from_str(&content)
        .map_err(|e| ImportError::config(format!("{}: {}", path.display(), e)))?;
    Ok(config.paths.unwrap_or_default())
}
