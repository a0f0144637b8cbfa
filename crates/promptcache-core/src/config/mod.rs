//! Configuration: provider credentials, cache limits, session behavior and
//! static assets.
//!
//! Settings load from a TOML/YAML/JSON file and are then overridden from the
//! environment. Credentials are validated before any conversation is created.

pub mod assets;
pub mod env_loader;
pub mod file_loader;
pub mod provider;
pub mod settings;

pub use assets::StaticAssets;
pub use env_loader::{apply_env_overrides, load_settings};
pub use file_loader::load_from_file;
pub use provider::{ProviderSettings, mask_api_key};
pub use settings::{AssetPaths, CacheSettings, ConcurrencyPolicy, SessionSettings, Settings};
