use std::fmt;

/// Categorized git failures with actionable guidance
#[derive(Debug)]
pub enum GitError {
    /// Not inside a git working tree
    NotARepository(String),
    /// A pathspec matched nothing
    PathspecMismatch(String),
    /// File system permission errors
    Permission(String),
    /// The `git` executable could not be located
    NotInstalled(String),
    /// Unknown or uncategorized error
    Unknown(String),
}

impl GitError {
    /// Parse git command stderr to categorize the error
    #[must_use]
    pub fn from_stderr(command: &str, stderr: &str) -> Self {
        let stderr_lower = stderr.to_lowercase();

        if stderr_lower.contains("not a git repository") {
            return Self::NotARepository(format!(
                "{}: Not a git repository - {}",
                command,
                extract_meaningful_message(stderr)
            ));
        }

        if stderr_lower.contains("did not match any file")
            || stderr_lower.contains("pathspec")
            || stderr_lower.contains("outside repository")
        {
            return Self::PathspecMismatch(format!(
                "{}: Path not eligible - {}",
                command,
                extract_meaningful_message(stderr)
            ));
        }

        if stderr_lower.contains("permission denied")
            || stderr_lower.contains("unable to create")
            || stderr_lower.contains("read-only")
            || stderr_lower.contains("cannot open")
        {
            return Self::Permission(format!(
                "{}: Permission error - {}",
                command,
                extract_meaningful_message(stderr)
            ));
        }

        Self::Unknown(format!(
            "{}: {}",
            command,
            extract_meaningful_message(stderr)
        ))
    }

    /// Get a user-friendly error message with actionable guidance
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotARepository(msg) => format!(
                "{msg}\n\nSuggestions:\n\
                 - Run git-owl from inside a git working tree\n\
                 - Check that GIT_DIR is not pointing somewhere unexpected"
            ),
            Self::PathspecMismatch(msg) => format!(
                "{msg}\n\nSuggestions:\n\
                 - Check the spelling of the given paths\n\
                 - Only untracked files that exist can be added\n\
                 - Paths are resolved relative to the current directory"
            ),
            Self::Permission(msg) => format!(
                "{msg}\n\nSuggestions:\n\
                 - Check file and directory permissions\n\
                 - Ensure you have write access to the working tree\n\
                 - Check if another process has the index locked"
            ),
            Self::NotInstalled(msg) => format!(
                "{msg}\n\nSuggestions:\n\
                 - Install git and make sure it is on PATH"
            ),
            Self::Unknown(msg) => format!(
                "{msg}\n\nThis is an unexpected error. Please check the message above for details."
            ),
        }
    }

    /// Get a short description of the error type
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::NotARepository(_) => "Not a Repository",
            Self::PathspecMismatch(_) => "Pathspec Mismatch",
            Self::Permission(_) => "Permission Denied",
            Self::NotInstalled(_) => "Git Not Found",
            Self::Unknown(_) => "Unknown Error",
        }
    }
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for GitError {}

/// Extract the most meaningful part of the error message
fn extract_meaningful_message(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(3)
        .collect();

    if lines.is_empty() {
        return "No error details available".to_string();
    }

    lines.join(" | ")
}
