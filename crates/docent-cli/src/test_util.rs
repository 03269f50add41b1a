use docent_lib::context::DocentContext;
use docent_lib::db::driver::DatabaseDriver;
use docent_lib::runtime::Runtime;
use docent_lib::settings::Settings;
use docent_lib::test_util::FakeProviders;

// Re-export shared helpers from docent-test-util.
pub use docent_test_util::docs::{write_corrupt_pdf, write_docs};

/// Create a [`Runtime`] with an in-memory database, a tempdir-based context
/// and the given fake providers.
///
/// The `name` must be unique per test to prevent cross-test DB collisions.
/// The caller must hold the returned [`tempfile::TempDir`] to keep the
/// temporary directory alive for the duration of the test.
pub fn runtime_with(name: &str, providers: FakeProviders) -> (tempfile::TempDir, Runtime) {
    let tmp = tempfile::tempdir().unwrap();
    let context = DocentContext::new(tmp.path().to_path_buf())
        .with_model_cache_dir(&tmp.path().join("models"));
    let db = DatabaseDriver::in_memory(name).unwrap();
    let runtime = Runtime {
        context,
        db,
        settings: Settings::default(),
        providers: Box::new(providers),
    };
    (tmp, runtime)
}

/// [`runtime_with`] using fakes without a reasoning model or web search.
pub fn runtime_in_memory(name: &str) -> (tempfile::TempDir, Runtime) {
    runtime_with(name, FakeProviders::default())
}
