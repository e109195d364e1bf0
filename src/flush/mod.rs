mod jsonl;

pub use jsonl::{flush_to_jsonl, read_history_jsonl, write_history_jsonl};
