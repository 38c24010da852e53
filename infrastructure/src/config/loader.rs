//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_CONFIG_FILES: [&str; 2] = ["trajopt.toml", ".trajopt.toml"];

/// Prefix for environment overrides (`TRAJOPT_SOLVER__COMMAND=...`)
const ENV_PREFIX: &str = "TRAJOPT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TRAJOPT_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./trajopt.toml` or `./.trajopt.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/trajopt-panel/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        // An explicit path that does not exist is an error, not a silent skip
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/trajopt-panel/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("trajopt-panel").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config sources being used (for --show-config)
    pub fn describe_sources(explicit: Option<&Path>) -> String {
        let mut out = String::from("Configuration sources (in priority order):\n");

        out.push_str(&format!("  [ENV  ] Environment: {}*\n", ENV_PREFIX));

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            out.push_str(&format!("  [{:<5}] Explicit: {}\n", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => out.push_str(&format!("  [FOUND] Project: {}\n", path.display())),
            None => out.push_str("  [     ] Project: ./trajopt.toml or ./.trajopt.toml\n"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            out.push_str(&format!("  [{:<5}] Global:  {}\n", mark, path.display()));
        }

        out.push_str("  [     ] Default: built-in defaults\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::time::Duration;
    use trajopt_domain::OptimizationRequest;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.parameters, OptimizationRequest::default());
        assert!(config.solver.command.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("trajopt-panel"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "trajopt.toml",
                r#"
                [parameters]
                iterations = 50
                print_level = 3
                "#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.parameters.iterations, 50);
            assert_eq!(config.parameters.print_level, 3);
            assert_eq!(config.parameters.tolerance, 1e-3);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".trajopt.toml", "[solver]\ncommand = \"project-solver\"\n")?;
            jail.create_file("custom.toml", "[solver]\ncommand = \"custom-solver\"\n")?;

            let explicit = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&explicit)).map_err(|e| *e)?;
            assert_eq!(config.solver.command.as_deref(), Some("custom-solver"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let explicit = PathBuf::from("does-not-exist.toml");
            assert!(ConfigLoader::load(Some(&explicit)).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file("trajopt.toml", "[solver]\ntimeout_seconds = 60\n")?;
            jail.set_env("TRAJOPT_SOLVER__TIMEOUT_SECONDS", "30");
            jail.set_env("TRAJOPT_PARAMETERS__SPARSE_FORWARD", "false");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.solver.timeout(), Some(Duration::from_secs(30)));
            assert!(!config.parameters.sparse_forward);
            Ok(())
        });
    }

    #[test]
    fn test_describe_sources_lists_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("trajopt.toml", "")?;
            let description = ConfigLoader::describe_sources(None);
            assert!(description.contains("[FOUND] Project: trajopt.toml"));
            assert!(description.contains("TRAJOPT_*"));
            Ok(())
        });
    }
}
