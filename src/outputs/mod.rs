//! Output generation: the latest/archive JSON files and the archive index.
//!
//! # Output Structure
//!
//! ```text
//! data_dir/
//! ├── news.json              # latest digest, overwritten each run
//! └── archive/
//!     ├── 2026-08-23.json    # immutable per-date snapshot
//!     └── index.json         # known archive dates, newest first, ≤ 100
//! ```

pub mod indexes;
pub mod json;
