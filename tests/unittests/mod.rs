// Unit tests harness
mod reader {
    include!("reader.rs");
}
mod jit {
    include!("jit.rs");
}
