// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structured JSON logging shared by both binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured JSON logging.
///
/// The crate logs at debug and everything else at info. These directives
/// are added after `RUST_LOG` and replace any with the same target, so
/// `RUST_LOG` can only add directives for other targets.
pub fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::from_default_env()
        .add_directive("weathersphere=debug".parse().expect("static directive"))
        .add_directive("info".parse().expect("static directive"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
