pub mod accumulator;
pub mod context;
pub mod registry;
pub mod types;

pub use accumulator::{FunctionCallAccumulator, FunctionCallDelta};
pub use context::FunctionContext;
pub use registry::{DispatchError, Function, FunctionRegistry, RegistryError, SharedFunction};
pub use types::{FunctionSchema, ParameterSpec, ParametersSchema};
