pub mod cache;
pub mod fixtures;
pub mod memory_dao;
pub mod postgres;
pub mod redis;
pub mod user_roles;

use std::sync::Once;

pub use cache::{FailingCache, failing_store, memory_store};
pub use memory_dao::InMemoryDao;
pub use user_roles::InMemoryUserRoles;

static TRACING: Once = Once::new();

/// Routes `tracing` output through the test harness; honours `RUST_LOG`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}
