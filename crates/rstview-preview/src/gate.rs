//! Readiness gate for project builds.

use crate::backend::BackendState;
use crate::error::PreviewError;

/// Refuse to trust build output unless the backend is ready and error-free.
///
/// The error flag wins over the ready flag: a backend that is ready but
/// reports an error is treated as failed.
///
/// # Errors
///
/// Returns [`PreviewError::BackendError`] when the backend reports an error
/// and [`PreviewError::BackendBusy`] when it is not ready.
pub fn check_readiness(state: BackendState) -> Result<(), PreviewError> {
    if state.error {
        return Err(PreviewError::BackendError);
    }
    if !state.ready {
        return Err(PreviewError::BackendBusy);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_passes() {
        assert!(check_readiness(BackendState::READY).is_ok());
    }

    #[test]
    fn test_not_ready_is_busy() {
        assert!(matches!(
            check_readiness(BackendState::BUSY),
            Err(PreviewError::BackendBusy)
        ));
    }

    #[test]
    fn test_error_wins_over_ready() {
        let state = BackendState {
            ready: true,
            error: true,
        };

        assert!(matches!(
            check_readiness(state),
            Err(PreviewError::BackendError)
        ));
    }

    #[test]
    fn test_error_while_not_ready() {
        assert!(matches!(
            check_readiness(BackendState::FAILED),
            Err(PreviewError::BackendError)
        ));
    }
}
