// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reader/writer adapters presenting the combined-object illusion.

mod reader;
mod writer;

pub use reader::{ReadEntry, UmaaFilteredReaderAdapter, UmaaReaderAdapter};
pub use writer::UmaaWriterAdapter;
