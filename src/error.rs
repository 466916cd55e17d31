use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A round was started with too few or too many icons selected.
    #[error("Please select between {min} and {max} icons")]
    SelectionRange { selected: usize, min: usize, max: usize },
}
