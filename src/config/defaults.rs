//! Default values for configuration fields

pub fn default_embedding_model() -> String {
    "text-embedding-3-large".to_string()
}

pub fn default_embedding_dimension() -> usize {
    3072
}

pub fn default_embedding_batch_size() -> usize {
    32
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn default_chunk_max_chars() -> usize {
    1000
}

pub fn default_chunk_overlap() -> usize {
    200
}

pub fn default_query_k() -> usize {
    5
}

pub fn default_scroll_limit() -> u32 {
    100
}

pub fn default_max_links_per_batch() -> usize {
    10
}

pub fn default_request_timeout_secs() -> u64 {
    30
}

pub fn default_server_bind() -> String {
    "127.0.0.1:5000".to_string()
}
