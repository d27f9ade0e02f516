use serde::{Deserialize, Serialize};

/// Index of a modal controller in its page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModalId(pub(crate) usize);

/// Index of a dropdown widget in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DropdownId(pub(crate) usize);

impl ModalId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl DropdownId {
    pub fn index(self) -> usize {
        self.0
    }
}
