//! Things the setup converges: links, git settings, preferences, packages,
//! the computer name.
//!
//! Each one can report how the machine currently differs from what is wanted
//! ([`Resource::current_state`]) and close that gap ([`Applicable::apply`]).
//! Applying a resource that is already correct is a no-op.
pub mod computer_name;
pub mod defaults;
pub mod git_config;
pub mod package;
pub mod symlink;

use anyhow::Result;

/// Something that can be put into its desired state.
pub trait Applicable {
    /// Short human-readable form, used in log lines.
    fn description(&self) -> String;

    /// Make the change.
    ///
    /// # Errors
    ///
    /// I/O failures, permission problems, or an external command exiting
    /// unsuccessfully.
    fn apply(&self) -> Result<ResourceChange>;
}

/// How a resource compares with what is wanted.
///
/// ```
/// use dotfyles::resources::ResourceState;
///
/// let state = ResourceState::Incorrect { current: "/elsewhere".into() };
/// assert_ne!(state, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Not there at all.
    Missing,
    /// Already as wanted.
    Correct,
    /// There, but different.
    Incorrect {
        /// What is there now.
        current: String,
    },
    /// Cannot be applied yet, e.g. a link whose source does not exist.
    Invalid {
        /// Why not.
        reason: String,
    },
}

/// What [`Applicable::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Created or updated.
    Applied,
    /// Nothing to do.
    AlreadyCorrect,
    /// Deliberately left alone.
    Skipped {
        /// Why.
        reason: String,
    },
}

/// An [`Applicable`] that can also inspect the machine.
pub trait Resource: Applicable {
    /// Compare the machine with the desired state.
    ///
    /// # Errors
    ///
    /// The state could not be read, e.g. a command could not be spawned.
    fn current_state(&self) -> Result<ResourceState>;
}

impl<T: Applicable + ?Sized> Applicable for &T {
    fn description(&self) -> String {
        (**self).description()
    }

    fn apply(&self) -> Result<ResourceChange> {
        (**self).apply()
    }
}

impl<T: Resource + ?Sized> Resource for &T {
    fn current_state(&self) -> Result<ResourceState> {
        (**self).current_state()
    }
}
