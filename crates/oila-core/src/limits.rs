//! Traversal limits for resource protection

/// Default tree traversal depth when the caller gives none (5)
pub const DEFAULT_TREE_DEPTH: u32 = 5;

/// Maximum tree traversal depth (50)
pub const MAX_TREE_DEPTH: u32 = 50;

/// Maximum combined kinship span (steps up + steps down) the vocabulary
/// covers; farther pairs fall back to the generic relative label (6)
pub const KIN_SPAN_CEILING: u32 = 6;

/// Limit violation error type
#[derive(Debug, Clone, PartialEq)]
pub enum LimitError {
    DepthTooLarge { depth: u32, max: u32 },
}

impl std::fmt::Display for LimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DepthTooLarge { depth, max } => {
                write!(f, "Traversal depth too large: {} (max {})", depth, max)
            }
        }
    }
}

impl std::error::Error for LimitError {}

/// Validate a requested tree traversal depth
pub fn validate_tree_depth(depth: u32) -> Result<(), LimitError> {
    if depth > MAX_TREE_DEPTH {
        return Err(LimitError::DepthTooLarge {
            depth,
            max: MAX_TREE_DEPTH,
        });
    }
    Ok(())
}
