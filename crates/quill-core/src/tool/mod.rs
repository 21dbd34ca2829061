//! Tool calls: parsing the marker protocol out of model text and the closed
//! set of supported tools.

mod function_call;
mod model;

pub use function_call::{FUNCTION_CALL_MARKER, FunctionCall, FunctionCallParser, has_function_call};
pub use model::{ToolCall, ToolName};
