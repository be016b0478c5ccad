mod get_prompt;
mod get_prompts;
mod get_trace;

pub use get_prompt::GetPromptHandler;
pub use get_prompts::GetPromptsHandler;
pub use get_trace::GetTraceHandler;
