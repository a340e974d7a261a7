// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by trigger operations.

use core::fmt;

use crate::trigger::TriggerId;

/// A trigger operation was invoked without a live registration in the
/// coordinator it was sent to.
///
/// This always indicates an integration bug (a missing or wrong coordinator,
/// or a handle used after [`detach`](crate::TooltipCoordinator::detach)), so
/// callers should surface it rather than recover from it.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum TooltipError {
    /// The trigger was attached to this coordinator but has since been detached.
    Detached(TriggerId),
    /// The trigger was attached to a different coordinator scope.
    ForeignScope(TriggerId),
}

impl TooltipError {
    /// The trigger handle the failed operation was invoked with.
    #[must_use]
    pub fn trigger(&self) -> TriggerId {
        match *self {
            Self::Detached(id) | Self::ForeignScope(id) => id,
        }
    }
}

impl fmt::Debug for TooltipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached(id) => write!(f, "TooltipError::Detached({id:?})"),
            Self::ForeignScope(id) => write!(f, "TooltipError::ForeignScope({id:?})"),
        }
    }
}

impl fmt::Display for TooltipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached(id) => write!(f, "tooltip trigger {id:?} is no longer attached"),
            Self::ForeignScope(id) => write!(
                f,
                "tooltip trigger {id:?} was used outside the coordinator scope it was attached to"
            ),
        }
    }
}

impl core::error::Error for TooltipError {}
