//! Deterministic renderers for evidence artifacts (Markdown summary, JSONL trace).

#![forbid(unsafe_code)]

mod jsonl;
mod markdown;

pub use jsonl::render_trace_jsonl;
pub use markdown::render_markdown;
