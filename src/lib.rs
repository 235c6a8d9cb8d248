mod align;
mod diff;
mod event;
mod markup;
mod tag_stack;
mod words;

pub use align::{Opcode, OpcodeKind, align};
pub use diff::{
    DELETED_TAG, INSERTED_TAG, REPLACED_ATTRIBUTE, REPLACED_ATTRIBUTE_VALUE, diff_events,
    diff_markup,
};
pub use event::{Attributes, Event, Position};
pub use markup::{ParseError, parse_events, serialize_events};
pub use words::split_words;

#[cfg(feature = "wasm")]
pub mod wasm;
