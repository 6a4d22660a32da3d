/// Top-level key holding the config schema version
pub const CONFIG_VERSION_KEY: &str = "config_version";
/// Config schema version this build understands
pub const CURRENT_CONFIG_VERSION: u64 = 2;
/// Environment variable that may carry the whole config document
pub const DEFAULT_CONFIG_ENV_KEY: &str = "DUSTPAN_CONFIG";
/// Config file read when the environment variable is unset or empty
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
/// Section holding per-stage defaults
pub const GENERAL_SECTION: &str = "general";
/// Section holding the named suites
pub const SUITES_SECTION: &str = "suites";
