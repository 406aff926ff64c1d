/// Phase of the focus countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    Running,
    Paused,
}

impl CountdownPhase {
    /// Short tag shown next to the timer
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingTask,
    ConfirmDelete,
    /// A task is due to start now, asking whether to focus on it
    TaskStarting,
    /// Focus overlay is open and receives keys
    Focus,
}

/// Field of the task editor form that receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Start,
    End,
    Description,
    Priority,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            Self::Title => Self::Start,
            Self::Start => Self::End,
            Self::End => Self::Description,
            Self::Description => Self::Priority,
            Self::Priority => Self::Title,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Start => "Start time (HH:MM)",
            Self::End => "End time (HH:MM)",
            Self::Description => "Description",
            Self::Priority => "Priority (0 low - 10 high)",
        }
    }

    pub fn all() -> &'static [FormField] {
        &[
            FormField::Title,
            FormField::Start,
            FormField::End,
            FormField::Description,
            FormField::Priority,
        ]
    }
}
