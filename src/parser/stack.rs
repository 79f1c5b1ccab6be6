//! Parse stack entries

use rowan::NodeOrToken;

use crate::table::{StateId, SymbolId};
use crate::tree::kind::{GreenElement, element_kind};

/// What an entry contributes to its parent node
#[derive(Debug, Clone)]
pub(super) enum Slot {
    One(GreenElement),
    /// Children of a hidden reduction, spliced into the parent
    Many(Vec<GreenElement>),
}

#[derive(Debug, Clone)]
pub(super) struct Entry {
    pub state: StateId,
    pub slot: Slot,
    /// Extras and ERROR nodes do not count as production children
    pub extra: bool,
    pub has_error: bool,
}

impl Entry {
    pub fn element(state: StateId, element: GreenElement) -> Self {
        Self {
            state,
            slot: Slot::One(element),
            extra: false,
            has_error: false,
        }
    }

    pub fn extra(state: StateId, element: GreenElement) -> Self {
        let has_error = element_kind(&element) == SymbolId::ERROR;
        Self {
            state,
            slot: Slot::One(element),
            extra: true,
            has_error,
        }
    }

    pub fn append_to(self, out: &mut Vec<GreenElement>) {
        match self.slot {
            Slot::One(element) => out.push(element),
            Slot::Many(elements) => out.extend(elements),
        }
    }

    /// Children of this entry as a vector, reusing a spliced vector in place
    pub fn into_elements(self) -> Vec<GreenElement> {
        match self.slot {
            Slot::One(element) => vec![element],
            Slot::Many(elements) => elements,
        }
    }

    pub fn as_node(&self) -> Option<&rowan::GreenNode> {
        match &self.slot {
            Slot::One(NodeOrToken::Node(node)) => Some(node),
            _ => None,
        }
    }
}
