use std::fmt;

/// Which API namespace produced a protocol error. Error codes overlap
/// between namespaces, so translation needs both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDomain {
    Auth,
    Task,
    FileStation,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Auth => write!(f, "auth"),
            ErrorDomain::Task => write!(f, "task"),
            ErrorDomain::FileStation => write!(f, "file station"),
        }
    }
}

/// Failure of a single API request.
///
/// Both kinds are plain data; they cross every boundary as `Result` values
/// and only become display strings at the point of consumption via
/// [`ApiError::user_message`]. Stale responses are not errors at all and
/// never reach this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: the server never gave a usable response.
    #[error("connection failed: {0}")]
    Connection(String),
    /// The server responded but declined or failed the operation.
    #[error("{domain} error code {code}")]
    Protocol { domain: ErrorDomain, code: u32 },
}

impl ApiError {
    /// Translates the failure into a message fit for direct display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Connection(detail) => {
                format!("Could not connect to the server ({detail}).")
            }
            ApiError::Protocol { domain, code } => translate(*domain, *code),
        }
    }
}

fn translate(domain: ErrorDomain, code: u32) -> String {
    if let Some(message) = common_message(code) {
        return message.to_string();
    }
    let specific = match domain {
        ErrorDomain::Auth => auth_message(code),
        ErrorDomain::Task => task_message(code),
        ErrorDomain::FileStation => file_station_message(code),
    };
    match specific {
        Some(message) => message.to_string(),
        None => format!("The server reported error {code} ({domain})."),
    }
}

fn common_message(code: u32) -> Option<&'static str> {
    Some(match code {
        100 => "The server reported an unknown error.",
        101 => "The server rejected the request parameters.",
        102 => "The requested API does not exist on this server.",
        103 => "The requested method does not exist on this server.",
        104 => "The server does not support this API version.",
        105 => "The logged-in session lacks permission for this operation.",
        106 => "The session timed out. Please try again.",
        107 => "The session was interrupted by a duplicate login.",
        _ => return None,
    })
}

fn auth_message(code: u32) -> Option<&'static str> {
    Some(match code {
        400 => "Incorrect username or password.",
        401 => "This account is disabled.",
        402 => "This account is not permitted to use the service.",
        403 | 404 => "Two-factor authentication is required; it is not supported here.",
        _ => return None,
    })
}

fn task_message(code: u32) -> Option<&'static str> {
    Some(match code {
        400 => "The task file could not be uploaded.",
        401 => "The maximum number of tasks has been reached.",
        402 => "The destination is denied.",
        403 => "The destination does not exist.",
        404 => "No such task.",
        405 => "This action is not valid for the task's current state.",
        406 => "No default destination is configured on the server.",
        _ => return None,
    })
}

fn file_station_message(code: u32) -> Option<&'static str> {
    Some(match code {
        400 => "The folder operation failed.",
        401 => "No permission to list this folder.",
        407 => "Permission denied for this folder.",
        408 => "The requested path does not exist.",
        _ => return None,
    })
}
