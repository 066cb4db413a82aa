// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for LetUsConnect integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockPublisher`] - Recording broker with a failure switch
//! - [`MockStore`] - In-memory document store with a failure switch
//! - [`TestHarness`] - Gateway wired to the mocks and a real JWT verifier

pub mod harness;
pub mod mock_publisher;
pub mod mock_store;

pub use harness::{TestHarness, TEST_SECRET};
pub use mock_publisher::{MockPublisher, PublishedEvent};
pub use mock_store::MockStore;
