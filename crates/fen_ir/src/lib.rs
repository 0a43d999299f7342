//! FenIR — the in-memory representation of digital logic for the fen core.
//!
//! This crate defines the data model a design author builds against:
//! [`Bv`] bit-vector types, [`Constant`]s, [`Signal`]s, arena-allocated
//! [`Expr`] trees, [`Statement`]s, and the [`Fragment`] aggregation unit,
//! all constructed through a [`Design`] context. Elaboration and code
//! generation live in separate crates and consume these types read-only.

#![warn(missing_docs)]

pub mod arena;
pub mod bv;
pub mod constant;
pub mod design;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod ids;
pub mod instance;
pub mod memory;
pub mod signal;
pub mod stmt;

pub use arena::{Arena, ArenaId};
pub use bv::Bv;
pub use constant::Constant;
pub use design::Design;
pub use error::IrError;
pub use expr::{BinaryOp, Expr, UnaryOp};
pub use fragment::Fragment;
pub use ids::{ExprId, SignalId};
pub use instance::{Instance, ParamValue};
pub use memory::{Memory, MemoryPort, WriteMode};
pub use signal::Signal;
pub use stmt::{CaseArm, CaseEntry, Statement};
