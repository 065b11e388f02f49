// Error handling utilities for consistent error messages and exit codes

use std::process;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, unreadable pages, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Validate a builder name before it is used as a flag file name
pub fn validate_builder_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Builder name cannot be empty".to_string());
    }

    if name == "." || name == ".." {
        return Err(format!("Invalid builder name: '{}'", name));
    }

    // Builder names may contain spaces (e.g. "Linux64 Release") but must stay one path component
    if name.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
        Err(format!("Invalid builder name: '{}'. Builder names cannot contain path separators.", name))
    } else {
        Ok(())
    }
}
