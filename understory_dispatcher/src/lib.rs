// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Dispatcher: thread-affine execution for UI objects.
//!
//! UI objects typically live on one thread and must only be touched there.
//! This crate provides the machinery for running work on that thread from
//! anywhere else and getting the result back.
//!
//! ## Core Concepts
//!
//! ### Owner thread
//!
//! A [`Dispatcher`] is bound to the thread that created it. That thread drives
//! a [`DispatcherLoop`], which pulls queued work in [`Priority`] order and runs
//! it. [`DispatcherBuilder::spawn`] creates a dedicated owner thread instead.
//!
//! ### Invocation
//!
//! - [`Dispatcher::invoke`] runs a closure on the owner thread and blocks for
//!   the result. On the owner thread itself it runs inline, so nested and
//!   reentrant calls don't deadlock.
//! - [`Dispatcher::try_invoke`] is the fallible form. The closure's own error
//!   comes back unchanged; marshaling failures are converted into the same
//!   error type.
//! - [`Dispatcher::begin_invoke`] queues a closure and returns immediately.
//!
//! A panic in marshaled work is caught on the owner thread, which keeps
//! running, and resumed on the caller with its original payload.
//!
//! ### Timeouts and shutdown
//!
//! A marshaled call waits at most its timeout (per call via
//! [`InvokeOptions`], or the dispatcher default). A call that times out is
//! abandoned: skipped if it has not started, otherwise left to finish with its
//! result dropped. After [`Dispatcher::shutdown`], queued and new marshaled
//! calls fail with [`InvokeError::Shutdown`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use understory_dispatcher::{DispatcherBuilder, InvokeError, InvokeOptions};
//!
//! let owner = DispatcherBuilder::new()
//!     .name("ui")
//!     .default_timeout(Duration::from_secs(5))
//!     .spawn()
//!     .unwrap();
//! let dispatcher = owner.dispatcher().clone();
//!
//! let answer = dispatcher.invoke(|| 6 * 7);
//! assert_eq!(answer, Ok(42));
//!
//! #[derive(Debug, PartialEq)]
//! enum AppError {
//!     Invalid,
//!     Dispatch(InvokeError),
//! }
//!
//! impl From<InvokeError> for AppError {
//!     fn from(err: InvokeError) -> Self {
//!         Self::Dispatch(err)
//!     }
//! }
//!
//! let result: Result<(), AppError> = dispatcher.try_invoke(|| Err(AppError::Invalid));
//! assert_eq!(result, Err(AppError::Invalid));
//!
//! owner.join().unwrap();
//! let late = dispatcher.invoke_with(InvokeOptions::new(), || ());
//! assert_eq!(late, Err(InvokeError::Shutdown));
//! ```
//!
//! ## Logging
//!
//! Work items are traced with [`tracing`]: enqueue and dispatch at `trace`,
//! start and shutdown at `debug`, and timeouts, skipped work and panics in
//! posted work at `warn` or above. The submitter's span is entered while an
//! item runs on the owner thread.

mod dispatcher;
mod error;
mod host;
mod priority;
mod queue;

pub use dispatcher::{Dispatcher, InvokeOptions};
pub use error::InvokeError;
pub use host::{DispatcherBuilder, DispatcherLoop, DispatcherThread};
pub use priority::Priority;
