//! Translation store codec
mod backing;
mod codec;

pub use backing::{
    BackingField,
    MemoryModel,
};
pub use codec::{
    DEFAULT_SUFFIX,
    field_name,
    read,
    read_map,
    replace,
    write,
};
