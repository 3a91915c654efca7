//! Configuration loading

mod loader;

pub use loader::{
    apply_env_overrides, ConfigLoader, ENV_APP_ROOT, ENV_ENVIRONMENT, ENV_EXTRA_ROOTS,
    ENV_REGISTRY_URL, ENV_WORK_DIR,
};
