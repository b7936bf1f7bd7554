//! Runnable demos. See `examples/`.
