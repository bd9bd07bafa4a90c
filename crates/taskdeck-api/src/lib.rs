//! Shared wire types and domain logic for the taskdeck dashboard and gateway.
//!
//! Everything in this crate is plain data plus pure functions, so it compiles
//! for both the native gateway and the `wasm32-unknown-unknown` dashboard.

pub mod envelope;
pub mod filter;
pub mod pagination;
pub mod task;

pub use envelope::{ErrorEnvelope, FailureMessage};
pub use filter::{TaskFilterRequest, effective_window};
pub use pagination::PageInfo;
pub use task::{
    Account, CreateTaskRequest, LoginData, LoginRequest, LoginResponse, Task, TaskListResponse,
    TaskStatus, UpdateTaskRequest,
};
