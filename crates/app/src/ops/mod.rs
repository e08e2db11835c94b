pub mod service;
pub mod subscribe;
pub mod sync;
pub mod version;

pub use service::Service;
pub use subscribe::Subscribe;
pub use sync::SyncNow;
pub use version::Version;
