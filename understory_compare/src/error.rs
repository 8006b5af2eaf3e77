// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use alloc::string::String;

use thiserror::Error;

/// A fatal problem with how the control was configured.
///
/// Returned from [`Compare::new`](crate::Compare::new) before anything is
/// mounted, and from the `FromStr` impls of option enums.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The container selector matched nothing.
    #[error("cannot find element with container selector `{0}`")]
    SelectorNotFound(String),
    /// The container selector matched a node that cannot host the control.
    #[error("container selector `{0}` must point to an HTML element")]
    NotAnHtmlElement(String),
    /// A direct container reference is unknown to the document or is not an
    /// HTML element.
    #[error("invalid container: must be a CSS selector or an HTML element")]
    InvalidContainer,
    /// Unrecognized theme name.
    #[error("unknown theme `{0}`, expected `light`, `dark` or `system`")]
    UnknownTheme(String),
    /// Unrecognized orientation name.
    #[error("unknown orientation `{0}`, expected `vertical` or `horizontal`")]
    UnknownOrientation(String),
}
