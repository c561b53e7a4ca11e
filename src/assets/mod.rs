pub mod loader;
pub mod types;

pub use loader::{load_assets_file, read_assets, InputError, LoadedAssets};
pub use types::{parse_amount, AssetRow};
