use finproof_types::TraceEvent;

/// One compact JSON object per line, in trace order, newline-terminated.
pub fn render_trace_jsonl(trace: &[TraceEvent]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for event in trace {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}
