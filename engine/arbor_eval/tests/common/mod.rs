//! Shared helpers for integration tests.

use std::sync::Once;

use arbor_eval::{BasicContext, FunctionRegistry, NumberKind};

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for debugging test runs.
///
/// Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=arbor_eval=trace cargo test -p arbor_eval`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_test_writer())
                .with(filter)
                .init();
        }
    });
}

/// A context with the builtins registered.
pub fn context(kind: NumberKind) -> BasicContext {
    init_tracing();
    BasicContext::builder()
        .number_kind(kind)
        .functions(FunctionRegistry::with_builtins())
        .build()
}
