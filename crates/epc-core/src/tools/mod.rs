//! Wellness tools: static registry and cooldown-scaled rewards.

mod cooldown;
mod registry;

pub use cooldown::{effectiveness, CooldownStatus, ToolUsage};
pub use registry::{tool_config, BufferSpec, TailSpec, ToolConfig, ToolId, ToolState};
