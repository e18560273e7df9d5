//! spider-core - Core types for the conversational orchestration core
//!
//! This crate provides the foundational types used across the spider crates:
//! - `turn` - conversation turns and function invocations
//! - `estimator` - budget-unit estimation for history selection
//! - `functions` - capability trait, registry, dispatch and streaming accumulation

pub mod estimator;
pub mod functions;
pub mod turn;

pub use estimator::{CharRatioEstimator, SharedEstimator, TokenEstimator};
pub use functions::{
    DispatchError, Function, FunctionCallAccumulator, FunctionCallDelta, FunctionContext,
    FunctionRegistry, FunctionSchema, ParameterSpec, ParametersSchema, RegistryError,
    SharedFunction,
};
pub use turn::{FunctionInvocation, Role, Turn};
