//! Screen state holders.
//!
//! Each model owns the subscriptions it reads from and exposes a plain state
//! struct. Store changes are pulled in with `refresh()`; failures end up in the
//! state's `error` field rather than being returned, and `retry()` runs the
//! failed load again. An error from a pushed update is cleared by the next
//! successful push.

mod library;
mod profile;
mod reader;
mod today;

pub use library::{LibraryModel, LibraryState};
pub use profile::{ProfileModel, ProfileState};
pub use reader::{ReaderModel, ReaderState};
pub use today::{TodayModel, TodayState};

use crate::core::Subscription;
use crate::error::MythlyError;

/// What draining one subscription produced.
#[derive(Debug, PartialEq, Eq)]
enum Drained {
    Idle,
    Updated,
    Failed(String),
}

/// Move the newest pushed value, if any, into `target`.
fn drain_into<T>(
    subscription: Option<&Subscription<Result<T, MythlyError>>>,
    target: &mut T,
) -> Drained {
    match subscription.and_then(Subscription::latest) {
        None => Drained::Idle,
        Some(Ok(value)) => {
            *target = value;
            Drained::Updated
        }
        Some(Err(e)) => {
            tracing::error!("Store update failed: {e}");
            Drained::Failed(e.to_string())
        }
    }
}

/// Fold drained pushes into the screen error.
///
/// A failed push sets the message; a clean update clears one left by an
/// earlier push.
fn settle<I>(error: &mut Option<String>, outcomes: I)
where
    I: IntoIterator<Item = Drained>,
{
    let mut updated = false;
    for outcome in outcomes {
        match outcome {
            Drained::Idle => {}
            Drained::Updated => updated = true,
            Drained::Failed(message) => {
                *error = Some(message);
                return;
            }
        }
    }
    if updated {
        *error = None;
    }
}
