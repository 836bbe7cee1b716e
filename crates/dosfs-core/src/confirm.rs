//! Confirmation gate for destructive steps.
//!
//! Handlers never talk to a terminal. They ask [`should_proceed`], which
//! consults the command's [`ConfirmPolicy`] and, only when needed, the
//! injected [`Prompter`].

/// How a command treats destructive steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmPolicy {
    /// Proceed without asking (`-q`).
    Always,
    /// Skip without asking.
    Never,
    /// Ask only for ambiguous steps such as deleting a whole subtree or
    /// overwriting an existing file.
    #[default]
    IfAmbiguous,
    /// Ask before every destructive step (`-i`).
    Prompt,
}

impl ConfirmPolicy {
    /// One step more cautious, used once the user typed a wildcard.
    pub fn escalate(self) -> Self {
        match self {
            Self::IfAmbiguous => Self::Prompt,
            other => other,
        }
    }
}

/// Interactive yes/no question.
pub trait Prompter {
    /// `true` for yes. End of input counts as no.
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Prompter for F {
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// Decide whether a destructive step goes ahead.
pub fn should_proceed(
    policy: ConfirmPolicy,
    prompter: &mut dyn Prompter,
    question: &str,
    ambiguous: bool,
) -> bool {
    let proceed = match policy {
        ConfirmPolicy::Always => true,
        ConfirmPolicy::Never => false,
        ConfirmPolicy::IfAmbiguous if !ambiguous => true,
        ConfirmPolicy::IfAmbiguous | ConfirmPolicy::Prompt => prompter.confirm(question),
    };
    if !proceed {
        log::warn!("declined: {question}");
    }
    proceed
}
