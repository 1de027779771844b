pub const DEFAULT_CHUNK_SIZE: usize = 100;
pub const DEFAULT_PROCESS_CLUSTERED_REMAPPED_VARIANTS: bool = true;
