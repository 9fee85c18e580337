//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod page;

pub(crate) use convert::ConvertArgs;
pub(crate) use page::PageArgs;
